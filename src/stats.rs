// Library statistics — per-kind counts, ratings and tag popularity.

use std::collections::HashMap;

use serde::Serialize;

use crate::library::models::{MediaKind, Status, TrackedItem};
use crate::recommend::tags::Tags;

/// How many tags `top_tags` keeps.
pub const TOP_TAG_COUNT: usize = 5;

/// Books often carry long subject lists; only the leading ones are counted.
const BOOK_SUBJECTS_COUNTED: usize = 3;

#[derive(Debug, Clone, Serialize)]
pub struct LibraryStats {
    pub kind: MediaKind,
    pub total: usize,
    /// One entry per status value, zeros included, in display order
    pub by_status: Vec<(String, usize)>,
    pub favorites: usize,
    /// Mean user rating rounded to one decimal, None when nothing is rated
    pub average_rating: Option<f64>,
    pub top_tags: Vec<(String, usize)>,
    /// Counts for ratings 1..=10 (index 0 is rating 1)
    pub rating_distribution: [usize; 10],
    pub unrated: usize,
    /// Series only; zero for movies and books
    pub episodes_watched: usize,
}

impl LibraryStats {
    /// Compute stats for one kind. Items of other kinds are ignored.
    pub fn compute(kind: MediaKind, items: &[TrackedItem]) -> Self {
        let items: Vec<&TrackedItem> = items.iter().filter(|i| i.kind() == kind).collect();

        let by_status = kind
            .statuses()
            .into_iter()
            .map(|status: Status| {
                let count = items.iter().filter(|i| i.status() == status).count();
                (status.as_str().to_string(), count)
            })
            .collect();

        let mut rating_distribution = [0usize; 10];
        let mut unrated = 0;
        let mut rating_sum = 0u32;
        let mut rated = 0u32;
        for item in &items {
            match item.user_rating().filter(|r| (1..=10).contains(r)) {
                Some(r) => {
                    rating_distribution[usize::from(r) - 1] += 1;
                    rating_sum += u32::from(r);
                    rated += 1;
                }
                None => unrated += 1,
            }
        }
        let average_rating = (rated > 0)
            .then(|| (f64::from(rating_sum) / f64::from(rated) * 10.0).round() / 10.0);

        let episodes_watched = items
            .iter()
            .map(|item| match item {
                TrackedItem::Series(s) => s.episodes_watched.len(),
                _ => 0,
            })
            .sum();

        LibraryStats {
            kind,
            total: items.len(),
            by_status,
            favorites: items.iter().filter(|i| i.is_favorite()).count(),
            average_rating,
            top_tags: count_tags(kind, &items),
            rating_distribution,
            unrated,
            episodes_watched,
        }
    }
}

/// Most common tags, most frequent first. Ties keep first-seen order.
fn count_tags(kind: MediaKind, items: &[&TrackedItem]) -> Vec<(String, usize)> {
    let per_item = match kind {
        MediaKind::Book => BOOK_SUBJECTS_COUNTED,
        MediaKind::Movie | MediaKind::Series => usize::MAX,
    };

    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    for item in items {
        for tag in Tags::parse(item.tag_field()).iter().take(per_item) {
            let count = counts.entry(tag.to_string()).or_insert_with(|| {
                order.push(tag.to_string());
                0
            });
            *count += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = order
        .into_iter()
        .map(|tag| {
            let count = counts.get(&tag).copied().unwrap_or(0);
            (tag, count)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(TOP_TAG_COUNT);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::models::{Book, BookStatus, Episode, Movie, MovieStatus, Series, SeriesStatus};

    #[test]
    fn test_empty_library() {
        let stats = LibraryStats::compute(MediaKind::Movie, &[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.by_status.len(), 3);
        assert!(stats.by_status.iter().all(|(_, n)| *n == 0));
        assert_eq!(stats.average_rating, None);
        assert!(stats.top_tags.is_empty());
    }

    #[test]
    fn test_movie_stats() {
        let mut a = Movie::new("A", MovieStatus::Watched);
        a.user_rating = Some(8);
        a.genre = Some("Drama, Crime".to_string());
        a.is_favorite = true;
        let mut b = Movie::new("B", MovieStatus::Watched);
        b.user_rating = Some(7);
        b.genre = Some("Drama".to_string());
        let c = Movie::new("C", MovieStatus::WantToWatch);
        let items: Vec<TrackedItem> = vec![a.into(), b.into(), c.into()];

        let stats = LibraryStats::compute(MediaKind::Movie, &items);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_status[0], ("watched".to_string(), 2));
        assert_eq!(stats.by_status[2], ("want_to_watch".to_string(), 1));
        assert_eq!(stats.favorites, 1);
        assert_eq!(stats.average_rating, Some(7.5));
        assert_eq!(stats.top_tags[0], ("Drama".to_string(), 2));
        assert_eq!(stats.rating_distribution[7], 1);
        assert_eq!(stats.unrated, 1);
    }

    #[test]
    fn test_books_count_first_three_subjects() {
        let mut book = Book::new("Dune", BookStatus::Read);
        book.subjects = Some("A, B, C, D".to_string());
        let items: Vec<TrackedItem> = vec![book.into()];

        let stats = LibraryStats::compute(MediaKind::Book, &items);
        let tags: Vec<&str> = stats.top_tags.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(tags, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_series_episodes() {
        let mut series = Series::new("Dark", SeriesStatus::Watching);
        series.episodes_watched = vec![
            Episode { season: 1, episode: 1 },
            Episode { season: 1, episode: 2 },
        ];
        let items: Vec<TrackedItem> = vec![series.into()];
        let stats = LibraryStats::compute(MediaKind::Series, &items);
        assert_eq!(stats.episodes_watched, 2);
        assert_eq!(stats.by_status.len(), 5);
    }
}
