//! Text measurements shared by the classifiers.

use regex::Regex;
use std::sync::OnceLock;

/// Sentence boundary: Latin terminators followed by whitespace or end of
/// text, or any run of CJK full-width terminators.
fn sentence_boundary_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[.!?]+(?:\s+|$)|[。！？]+").expect("sentence boundary regex must compile")
    })
}

/// Length in characters (not bytes).
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Number of non-empty sentence segments.
///
/// Decimal points and version numbers ("v1.5") do not split, since a Latin
/// terminator only counts when followed by whitespace or end of text.
pub fn sentence_count(text: &str) -> usize {
    sentence_boundary_re()
        .split(text)
        .filter(|segment| !segment.trim().is_empty())
        .count()
}

/// Whether the text contains a sentence boundary or an ellipsis.
///
/// A decimal point ("GPT-4.5") is not a boundary.
pub fn has_terminal_punctuation(text: &str) -> bool {
    sentence_boundary_re().is_match(text) || text.contains('…')
}

/// Byte offsets of the `radius` characters on each side of `start..end`.
///
/// Returns the text before and after the span, never splitting a character.
pub fn surrounding(text: &str, start: usize, end: usize, radius: usize) -> (&str, &str) {
    let before_start = text[..start]
        .char_indices()
        .rev()
        .take(radius)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(start);
    let after_end = text[end..]
        .char_indices()
        .nth(radius)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());
    (&text[before_start..start], &text[end..after_end])
}
