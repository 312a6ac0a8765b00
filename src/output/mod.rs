// Output formatting — terminal display of library items, picks and stats.

pub mod terminal;

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Plot summaries and notes regularly carry accented letters, so this counts
/// characters rather than slicing bytes.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("Amélie", 10), "Amélie");
        assert_eq!(truncate_chars("Amélie Poulain", 4), "Amél...");
    }
}
