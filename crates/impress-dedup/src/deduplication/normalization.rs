//! Text normalization for deduplication comparison

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Anything that is neither a word character nor whitespace
    static ref NON_WORD: Regex = Regex::new(r"[^\w\s]").unwrap();
}

/// Normalize a field value for comparison
///
/// - Converts to lowercase
/// - Removes punctuation and symbols
/// - Collapses whitespace
/// - Trims
///
/// Idempotent: normalizing a normalized string returns it unchanged.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = NON_WORD.replace_all(&lowered, "");
    collapse_whitespace(&stripped).trim().to_string()
}

/// Normalize an author name: `normalize`, then drop initials
/// (single-character tokens).
pub fn normalize_author_name(name: &str) -> String {
    normalize(name)
        .split_whitespace()
        .filter(|token| token.chars().count() > 1)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collapse multiple whitespace characters into a single space
fn collapse_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_was_space = false;

    for c in s.chars() {
        if c.is_whitespace() {
            if !prev_was_space {
                result.push(' ');
                prev_was_space = true;
            }
        } else {
            result.push(c);
            prev_was_space = false;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_basic() {
        assert_eq!(normalize("Machine   Learning"), "machine learning");
        assert_eq!(normalize("  Hello, World!  "), "hello world");
        assert_eq!(normalize("Test: A Study"), "test a study");
    }

    #[test]
    fn test_normalize_keeps_digits_and_underscores() {
        assert_eq!(normalize("COVID-19 in 2020"), "covid19 in 2020");
        assert_eq!(normalize("snake_case"), "snake_case");
    }

    #[test]
    fn test_normalize_tabs_and_newlines() {
        assert_eq!(normalize("a\t\tb\n\nc"), "a b c");
    }

    #[test]
    fn test_normalize_keeps_non_ascii_letters() {
        assert_eq!(normalize("Études Françaises"), "études françaises");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("?!."), "");
    }

    #[test]
    fn test_normalize_author_drops_initials() {
        assert_eq!(normalize_author_name("Smith, J."), "smith");
        assert_eq!(normalize_author_name("J. R. Tolkien"), "tolkien");
        assert_eq!(normalize_author_name("Jane  Doe"), "jane doe");
    }

    #[test]
    fn test_normalize_author_joined_initials_survive() {
        // "J.R.R." loses its dots and becomes one token
        assert_eq!(normalize_author_name("J.R.R. Tolkien"), "jrr tolkien");
    }
}
