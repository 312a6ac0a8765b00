// Similarity ranking — "more like this" within one media kind.
//
// Each candidate is scored against the reference item with a fixed,
// additive rubric. Factors that don't apply (missing year, unrated, no
// director) add nothing; nothing ever subtracts. Candidates that end up at
// exactly 0.0 share nothing with the reference and are left out.
//
//   tags       2.0 per shared distinct tag            (all kinds)
//   creator    +3.0 same director / +4.0 same author  (movies / books)
//   year       0.5 * (10 - diff) when diff <= 10      (movies, series)
//   rating     0.3 * (10 - diff) when diff <= 3       (movies)

use super::facet::{facets, Facet};
use crate::library::models::{MediaKind, TrackedItem};

/// Length of a similar-items list when the caller doesn't choose.
pub const DEFAULT_LIMIT: usize = 5;

/// A "closer is better" factor: `weight * (base - diff)` while `diff <= max_diff`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Proximity {
    pub weight: f64,
    pub max_diff: i32,
    pub base: i32,
}

impl Proximity {
    pub fn contribution(&self, a: i32, b: i32) -> f64 {
        let diff = (a - b).abs();
        if diff <= self.max_diff {
            self.weight * f64::from(self.base - diff)
        } else {
            0.0
        }
    }
}

/// Per-kind scoring rubric. `None` disables a factor.
#[derive(Debug, Clone, PartialEq)]
pub struct Rubric {
    pub tag_weight: f64,
    pub creator_bonus: Option<f64>,
    pub year: Option<Proximity>,
    pub rating: Option<Proximity>,
}

impl Rubric {
    pub fn for_kind(kind: MediaKind) -> Self {
        let year = Proximity {
            weight: 0.5,
            max_diff: 10,
            base: 10,
        };
        match kind {
            MediaKind::Movie => Rubric {
                tag_weight: 2.0,
                creator_bonus: Some(3.0),
                year: Some(year),
                rating: Some(Proximity {
                    weight: 0.3,
                    max_diff: 3,
                    base: 10,
                }),
            },
            MediaKind::Book => Rubric {
                tag_weight: 2.0,
                creator_bonus: Some(4.0),
                year: None,
                rating: None,
            },
            MediaKind::Series => Rubric {
                tag_weight: 2.0,
                creator_bonus: None,
                year: Some(year),
                rating: None,
            },
        }
    }

    /// Score one candidate against the reference. Never negative.
    pub fn score(&self, reference: &Facet, candidate: &Facet) -> f64 {
        let mut score = self.tag_weight * reference.tags.shared_with(&candidate.tags) as f64;

        if let (Some(bonus), Some(a), Some(b)) = (
            self.creator_bonus,
            reference.creator.as_deref(),
            candidate.creator.as_deref(),
        ) {
            if a == b {
                score += bonus;
            }
        }

        if let (Some(year), Some(a), Some(b)) = (self.year, reference.year, candidate.year) {
            score += year.contribution(a, b);
        }

        if let (Some(rating), Some(a), Some(b)) = (self.rating, reference.rating, candidate.rating)
        {
            score += rating.contribution(i32::from(a), i32::from(b));
        }

        score
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimilarItem {
    pub item: TrackedItem,
    pub score: f64,
}

/// Rank `library` by similarity to `reference`, best first, at most `limit` long.
///
/// The reference itself and items of other kinds are skipped. Equal scores
/// keep their order in `library`.
pub fn find_similar(
    reference: &TrackedItem,
    library: &[TrackedItem],
    limit: usize,
) -> Vec<SimilarItem> {
    let rubric = Rubric::for_kind(reference.kind());
    let reference = Facet::of(reference);

    let candidates = facets(library);
    let mut scored: Vec<(&Facet, f64)> = Vec::new();
    for candidate in &candidates {
        if candidate.item.kind() != reference.item.kind() || candidate.is_same_item(&reference) {
            continue;
        }
        let score = rubric.score(&reference, candidate);
        if score > 0.0 {
            scored.push((candidate, score));
        }
    }

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(limit);

    scored
        .into_iter()
        .map(|(facet, score)| SimilarItem {
            item: facet.item.clone(),
            score,
        })
        .collect()
}
