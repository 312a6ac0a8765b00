// Facet — the normalized, scorable view of a library item.
//
// Movies, books and series carry their tags, year and creator in different
// fields. A Facet pulls them into one shape once per snapshot so the scorer
// and ranker never branch on the media kind or re-split tag strings.

use super::tags::{parse_year, Tags};
use crate::library::models::TrackedItem;

#[derive(Debug, Clone)]
pub struct Facet<'a> {
    pub item: &'a TrackedItem,
    pub tags: Tags,
    /// User rating, only when it lies in 1..=10
    pub rating: Option<u8>,
    pub year: Option<i32>,
    /// Director or author, lowercased for case-insensitive comparison.
    /// Surrounding whitespace is kept; only empty strings are dropped.
    pub creator: Option<String>,
}

impl<'a> Facet<'a> {
    pub fn of(item: &'a TrackedItem) -> Self {
        let year = match item {
            TrackedItem::Book(book) => book.publish_year.filter(|y| *y > 0),
            _ => parse_year(item.year_label().as_deref()),
        };

        Facet {
            item,
            tags: Tags::parse(item.tag_field()),
            rating: item.user_rating().filter(|r| (1..=10).contains(r)),
            year,
            creator: item
                .creator()
                .filter(|c| !c.is_empty())
                .map(str::to_lowercase),
        }
    }

    /// Same item as `other` (same kind, same id).
    pub fn is_same_item(&self, other: &Facet) -> bool {
        self.item.kind() == other.item.kind() && self.item.id() == other.item.id()
    }
}

/// Build facets for a whole snapshot.
pub fn facets(items: &[TrackedItem]) -> Vec<Facet<'_>> {
    items.iter().map(Facet::of).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::models::{Book, BookStatus, Movie, MovieStatus, Series, SeriesStatus};

    #[test]
    fn test_movie_facet() {
        let mut movie = Movie::new("Heat", MovieStatus::Watched);
        movie.genre = Some("Crime, Drama".to_string());
        movie.director = Some("Michael MANN".to_string());
        movie.year = Some("1995".to_string());
        movie.user_rating = Some(9);
        let item = TrackedItem::from(movie);

        let facet = Facet::of(&item);
        assert_eq!(facet.tags.len(), 2);
        assert_eq!(facet.creator.as_deref(), Some("michael mann"));
        assert_eq!(facet.year, Some(1995));
        assert_eq!(facet.rating, Some(9));
    }

    #[test]
    fn test_creator_is_lowercased_not_trimmed() {
        let mut padded = Movie::new("Heat", MovieStatus::Watched);
        padded.director = Some(" Michael Mann ".to_string());
        let mut empty = Movie::new("Thief", MovieStatus::Watched);
        empty.director = Some(String::new());
        let (padded, empty) = (TrackedItem::from(padded), TrackedItem::from(empty));

        assert_eq!(Facet::of(&padded).creator.as_deref(), Some(" michael mann "));
        assert_eq!(Facet::of(&empty).creator, None);
    }

    #[test]
    fn test_out_of_range_rating_is_absent() {
        let mut book = Book::new("Dune", BookStatus::Read);
        book.user_rating = Some(0);
        let item = TrackedItem::from(book);
        assert_eq!(Facet::of(&item).rating, None);
    }

    #[test]
    fn test_series_year_range() {
        let mut series = Series::new("Dark", SeriesStatus::Completed);
        series.year = Some("2017-2020".to_string());
        let item = TrackedItem::from(series);
        let facet = Facet::of(&item);
        assert_eq!(facet.year, Some(2017));
        assert_eq!(facet.creator, None);
    }

    #[test]
    fn test_same_item_needs_same_kind() {
        let mut movie = Movie::new("A", MovieStatus::Watched);
        movie.id = 1;
        let mut book = Book::new("A", BookStatus::Read);
        book.id = 1;
        let (m, b) = (TrackedItem::from(movie), TrackedItem::from(book));
        assert!(Facet::of(&m).is_same_item(&Facet::of(&m)));
        assert!(!Facet::of(&m).is_same_item(&Facet::of(&b)));
    }
}
