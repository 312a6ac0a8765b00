// Item scoring against a preference map.

use super::facet::Facet;
use super::preferences::PreferenceMap;
use crate::library::models::TrackedItem;

/// Sum of the preference weights of every tag on the item.
///
/// Items without tags score exactly 0.0. Repeated tags count each time.
pub fn score_item(item: &TrackedItem, prefs: &PreferenceMap) -> f64 {
    score_facet(&Facet::of(item), prefs)
}

pub fn score_facet(facet: &Facet, prefs: &PreferenceMap) -> f64 {
    if facet.tags.is_empty() {
        return 0.0;
    }
    facet.tags.iter().map(|tag| prefs.get(tag)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::models::{Series, SeriesStatus};

    fn series_with_genre(genre: Option<&str>) -> TrackedItem {
        let mut series = Series::new("Test", SeriesStatus::WantToWatch);
        series.genre = genre.map(str::to_string);
        series.into()
    }

    #[test]
    fn test_untagged_scores_zero() {
        let prefs: PreferenceMap = [("Drama", 9.0)].into_iter().collect();
        assert_eq!(score_item(&series_with_genre(None), &prefs), 0.0);
        assert_eq!(score_item(&series_with_genre(Some("")), &prefs), 0.0);
    }

    #[test]
    fn test_duplicate_tags_counted_twice() {
        let prefs: PreferenceMap = [("Drama", 3.0)].into_iter().collect();
        let score = score_item(&series_with_genre(Some("Drama, Drama")), &prefs);
        assert!((score - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_tags_contribute_nothing() {
        let prefs: PreferenceMap = [("Drama", 3.0), ("Comedy", 2.0)].into_iter().collect();
        let score = score_item(&series_with_genre(Some("Drama, Horror")), &prefs);
        assert!((score - 3.0).abs() < 1e-9);
    }
}
