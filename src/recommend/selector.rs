// Recommendation selection — pick one item from the backlog pool.
//
// Random mode draws uniformly from the pool. Smart mode scores every pool
// item against the preference map and draws uniformly among the items tied
// for the top score, even when that top score is zero. The only randomness
// goes through the injected Picker so tests can make it deterministic.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::facet::Facet;
use super::preferences::PreferenceMap;
use super::scorer::score_facet;
use crate::library::models::{MediaKind, TrackedItem};

/// How many top tags the reason names.
pub const REASON_TAG_COUNT: usize = 3;

/// Source of uniform choices. `pick(len)` must return an index in `0..len`;
/// it is never called with `len == 0`.
pub trait Picker {
    fn pick(&mut self, len: usize) -> usize;
}

/// Picker backed by a `rand` generator.
pub struct RandomPicker {
    rng: StdRng,
}

impl RandomPicker {
    /// Seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible picks for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Picker for RandomPicker {
    fn pick(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }
}

/// Why an item was (or wasn't) recommended.
#[derive(Debug, Clone, PartialEq)]
pub enum Basis {
    /// Nothing in the backlog to recommend.
    EmptyPool,
    /// Uniform pick, smart mode not requested.
    Random,
    /// Smart mode, but nothing completed has tags yet.
    NoPreferences,
    /// Won on preference score; `top_tags` are the user's heaviest tags.
    Preferred { score: f64, top_tags: Vec<String> },
    /// Smart mode, but no pool item shares a tag with the preferences.
    NoMatch,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub kind: MediaKind,
    pub item: Option<TrackedItem>,
    pub basis: Basis,
}

impl Recommendation {
    /// One-line, user-facing explanation of the pick.
    pub fn reason(&self) -> String {
        let kind = self.kind;
        match &self.basis {
            Basis::EmptyPool => format!("No {} in your {}.", kind.plural(), backlog_name(kind)),
            Basis::Random => format!("Random pick from your {}.", list_name(kind)),
            Basis::NoPreferences => format!(
                "Random pick (no {} {} to base preferences on).",
                completed_verb(kind),
                kind.plural()
            ),
            Basis::Preferred { top_tags, .. } => format!(
                "Based on your favorite {}s: {}",
                kind.tag_noun(),
                top_tags.join(", ")
            ),
            Basis::NoMatch => format!(
                "Random pick (no matching {}s in {}).",
                kind.tag_noun(),
                list_name(kind)
            ),
        }
    }
}

fn backlog_name(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Book => "want to read list",
        MediaKind::Movie | MediaKind::Series => "want to watch list",
    }
}

fn list_name(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Book => "reading list",
        MediaKind::Movie | MediaKind::Series => "watchlist",
    }
}

fn completed_verb(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Movie => "watched",
        MediaKind::Book => "read",
        MediaKind::Series => "completed",
    }
}

/// Pick one item from `pool`.
///
/// The chosen item is moved out of the pool. Equal top scores are compared
/// with exact float equality: scores are plain sums of the same weights, so
/// identical tag sets produce identical sums.
pub fn select(
    kind: MediaKind,
    mut pool: Vec<TrackedItem>,
    prefs: &PreferenceMap,
    smart: bool,
    picker: &mut dyn Picker,
) -> Recommendation {
    if pool.is_empty() {
        return Recommendation {
            kind,
            item: None,
            basis: Basis::EmptyPool,
        };
    }

    if !smart || prefs.is_empty() {
        let idx = picker.pick(pool.len());
        return Recommendation {
            kind,
            item: Some(pool.swap_remove(idx)),
            basis: if smart {
                Basis::NoPreferences
            } else {
                Basis::Random
            },
        };
    }

    let scores: Vec<f64> = pool
        .iter()
        .map(|item| score_facet(&Facet::of(item), prefs))
        .collect();
    let max_score = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let top: Vec<usize> = scores
        .iter()
        .enumerate()
        .filter(|(_, score)| **score == max_score)
        .map(|(i, _)| i)
        .collect();

    let idx = top[picker.pick(top.len())];
    let basis = if max_score > 0.0 {
        Basis::Preferred {
            score: max_score,
            top_tags: prefs
                .top_tags(REASON_TAG_COUNT)
                .into_iter()
                .map(|(tag, _)| tag.to_string())
                .collect(),
        }
    } else {
        Basis::NoMatch
    };

    Recommendation {
        kind,
        item: Some(pool.swap_remove(idx)),
        basis,
    }
}
