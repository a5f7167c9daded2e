// ─────────────────────────────────────────────────────────────────────
// TrustGraph Kernel — Text Helpers
// ─────────────────────────────────────────────────────────────────────
//! Phrase counting and sentence splitting shared by the analyzers.
//!
//! All matching is done on lowercase text. A phrase edge that is a letter
//! or digit must sit on a word boundary, so `"is"` does not match inside
//! `"this"` and `"nature"` does not match `"natural"`.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Runs of sentence-terminal punctuation.
pub(crate) static SENTENCE_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("sentence pattern is valid"));

/// Absolute http(s) URLs up to the next whitespace.
pub(crate) static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s]+").expect("url pattern is valid"));

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Count non-overlapping occurrences of `phrase` in `haystack`.
///
/// Both arguments are expected lowercase.
pub(crate) fn count_phrase(haystack: &str, phrase: &str) -> usize {
    if phrase.is_empty() {
        return 0;
    }
    let check_start = phrase.chars().next().is_some_and(is_word_char);
    let check_end = phrase.chars().next_back().is_some_and(is_word_char);

    haystack
        .match_indices(phrase)
        .filter(|(start, matched)| {
            let end = start + matched.len();
            let before_ok = !check_start
                || !haystack[..*start].chars().next_back().is_some_and(is_word_char);
            let after_ok =
                !check_end || !haystack[end..].chars().next().is_some_and(is_word_char);
            before_ok && after_ok
        })
        .count()
}

pub(crate) fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    count_phrase(haystack, phrase) > 0
}

/// Total occurrences of every phrase in `phrases`.
pub(crate) fn count_phrases(haystack: &str, phrases: &[String]) -> usize {
    phrases
        .iter()
        .map(|p| count_phrase(haystack, &p.to_lowercase()))
        .sum()
}

/// The phrases from `phrases` that occur at least once, in list order.
pub(crate) fn phrases_present<'a>(haystack: &str, phrases: &'a [String]) -> Vec<&'a str> {
    phrases
        .iter()
        .filter(|p| contains_phrase(haystack, &p.to_lowercase()))
        .map(String::as_str)
        .collect()
}

/// Share of sentences that repeat an earlier sentence, in [0, 1].
pub(crate) fn repetition_ratio(text: &str) -> f64 {
    let sentences: Vec<String> = SENTENCE_END_RE
        .split(text)
        .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();
    if sentences.len() < 2 {
        return 0.0;
    }
    let unique: HashSet<&str> = sentences.iter().map(String::as_str).collect();
    1.0 - unique.len() as f64 / sentences.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_phrase_respects_word_boundaries() {
        assert_eq!(count_phrase("this is it", "is"), 1);
        assert_eq!(count_phrase("natural nature", "nature"), 1);
        assert_eq!(count_phrase("not nothing knot", "not"), 1);
    }

    #[test]
    fn test_count_phrase_multiword_and_repeats() {
        let text = "studies show this. studies show that. studies shown";
        assert_eq!(count_phrase(text, "studies show"), 2);
    }

    #[test]
    fn test_count_phrase_punctuated_edges() {
        assert_eq!(count_phrase("author:jane doe", "author:"), 1);
        assert_eq!(count_phrase("a 100% guaranteed fix", "100% guaranteed"), 1);
    }

    #[test]
    fn test_phrases_present_keeps_list_order() {
        let list = vec!["clearly".to_string(), "obviously".to_string()];
        assert_eq!(
            phrases_present("obviously and clearly", &list),
            vec!["clearly", "obviously"]
        );
    }

    #[test]
    fn test_repetition_ratio() {
        assert_eq!(repetition_ratio("One sentence only."), 0.0);
        let r = repetition_ratio("Buy now. Buy  now! Something else. buy now?");
        assert!((r - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_url_pattern_stops_at_whitespace() {
        let m = URL_RE.find("see https://example.org/a?b=1 for more").unwrap();
        assert_eq!(m.as_str(), "https://example.org/a?b=1");
    }
}
