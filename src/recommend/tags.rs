// Tag and year parsing for loosely formatted library fields.
//
// Genres and subjects are stored as "Action, Drama" strings. They are split
// exactly on ", " and each piece is trimmed; blank pieces are dropped.
// Matching is case-sensitive. Years may be a run like "2019-2023", in which
// case the first year counts.

use std::collections::HashSet;

pub const TAG_SEPARATOR: &str = ", ";

/// Tags parsed from a comma-separated field, in field order.
///
/// Duplicates are kept: preference weighting and item scoring count every
/// occurrence, while similarity works on the distinct set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tags(Vec<String>);

impl Tags {
    pub fn parse(field: Option<&str>) -> Self {
        let tags = field
            .unwrap_or_default()
            .split(TAG_SEPARATOR)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        Tags(tags)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn distinct(&self) -> HashSet<&str> {
        self.iter().collect()
    }

    /// Size of the intersection of both distinct tag sets.
    pub fn shared_with(&self, other: &Tags) -> usize {
        let mine = self.distinct();
        other.distinct().intersection(&mine).count()
    }
}

/// Parse a year field into a number.
///
/// "2015" -> 2015, "2019-2023" -> 2019. Anything non-numeric (or zero)
/// yields None so the year factor is skipped rather than penalized.
pub fn parse_year(raw: Option<&str>) -> Option<i32> {
    let first = raw?.split('-').next()?.trim();
    if first.is_empty() || !first.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    first.parse::<i32>().ok().filter(|year| *year > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_on_comma_space() {
        let tags = Tags::parse(Some("Action, Drama, Sci-Fi"));
        assert_eq!(tags.iter().collect::<Vec<_>>(), vec!["Action", "Drama", "Sci-Fi"]);
    }

    #[test]
    fn test_parse_drops_blank_pieces() {
        let tags = Tags::parse(Some("Action, ,  , Drama, "));
        assert_eq!(tags.iter().collect::<Vec<_>>(), vec!["Action", "Drama"]);
        assert!(Tags::parse(Some("   ")).is_empty());
        assert!(Tags::parse(None).is_empty());
    }

    #[test]
    fn test_parse_without_space_is_one_tag() {
        // Only ", " separates tags
        let tags = Tags::parse(Some("Action,Drama"));
        assert_eq!(tags.len(), 1);
    }

    #[test]
    fn test_parse_keeps_duplicates() {
        let tags = Tags::parse(Some("Drama, Drama"));
        assert_eq!(tags.len(), 2);
        assert_eq!(tags.distinct().len(), 1);
    }

    #[test]
    fn test_shared_with_is_case_sensitive_set_intersection() {
        let a = Tags::parse(Some("Drama, Drama, Crime"));
        let b = Tags::parse(Some("drama, Crime, Drama"));
        assert_eq!(a.shared_with(&b), 2);
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year(Some("2015")), Some(2015));
        assert_eq!(parse_year(Some("2019-2023")), Some(2019));
        assert_eq!(parse_year(Some("2019-")), Some(2019));
        assert_eq!(parse_year(Some(" 1999 ")), Some(1999));
        assert_eq!(parse_year(Some("N/A")), None);
        assert_eq!(parse_year(Some("2019–2023")), None);
        assert_eq!(parse_year(Some("")), None);
        assert_eq!(parse_year(None), None);
    }
}
