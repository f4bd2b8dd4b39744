//! Fragment and placeholder detection.
//!
//! Flags strings that carry no information: empty text, lone bullets,
//! template remnants left by truncating feeds, and short broken clauses.
//! Rules are checked in order; any match means fragment.

use regex::Regex;
use std::sync::OnceLock;

use crate::classify::text::{char_len, has_terminal_punctuation};

/// Texts at or above this many characters are never judged by the
/// dangling-clause rule.
const SHORT_CLAUSE_LIMIT: usize = 40;

/// Minimum non-space characters for text without digits or entities.
const MIN_INFORMATIVE_CHARS: usize = 8;

/// Words that cannot open a standalone sentence.
const LEADING_CONNECTIVES: &[&str] = &[
    "and", "but", "or", "so", "because", "which", "that", "while", "although", "though",
    "whereas", "then", "also", "plus", "nor",
];

/// Words that cannot close a standalone sentence.
const TRAILING_PARTICLES: &[&str] = &[
    "the", "a", "an", "of", "to", "and", "or", "but", "with", "for", "in", "on", "at", "by",
    "from", "as", "that", "which", "than", "into", "about",
];

const CJK_LEADING: &[&str] = &[
    "和", "但", "而", "并且", "或者", "因为", "所以", "以及", "但是", "而且",
];

const CJK_TRAILING: &[&str] = &["的", "了", "和", "与", "及", "在", "把", "被", "对"];

fn lone_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:[-*•·●▪◦]+|\d{1,3}[.)、]?|[(（]\d{1,3}[)）]|[a-zA-Z][.)]|[一二三四五六七八九十]+[、.])$")
            .expect("lone marker regex must compile")
    })
}

fn template_remnant_res() -> &'static [Regex] {
    static RES: OnceLock<Vec<Regex>> = OnceLock::new();
    RES.get_or_init(|| {
        [
            // "Last July was..." / "This migration was..."
            r"(?i)^[^.!?。！？]{0,60}?\b(?:was|were|is|are|has|had|have|will|would|could)\s*(?:\.{2,}|…)$",
            // Truncation leftovers and link stubs
            r"(?i)^(?:read more|continue reading|click here|learn more|see more|more)\s*(?:\.{2,}|…|»|>>)?$",
            r"^\[\s*(?:…|\.{3})\s*\]$",
            r"(?i)^(?:n/?a|null|none|undefined|tbd|todo|placeholder|untitled)$",
            r"(?i)^lorem ipsum",
            // Short text that trails off
            r"^.{1,30}?(?:\.{3,}|…)$",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("template remnant regex must compile"))
        .collect()
    })
}

fn entity_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b\p{Lu}[\p{L}\p{N}]+|\p{Han}{2,}").expect("entity token regex must compile")
    })
}

fn trailing_conjunction_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[,，;；:：、\-–—]\s*$").expect("trailing conjunction regex must compile")
    })
}

/// Whether the text is empty, a placeholder, or a broken fragment.
pub fn is_fragment(text: &str) -> bool {
    let t = text.trim();

    if t.is_empty() {
        return true;
    }

    if lone_marker_re().is_match(t) {
        return true;
    }

    if template_remnant_res().iter().any(|re| re.is_match(t)) {
        return true;
    }

    let non_space = t.chars().filter(|c| !c.is_whitespace()).count();
    if non_space < MIN_INFORMATIVE_CHARS
        && !t.chars().any(|c| c.is_ascii_digit())
        && !entity_token_re().is_match(t)
    {
        return true;
    }

    if char_len(t) < SHORT_CLAUSE_LIMIT && !has_terminal_punctuation(t) {
        return starts_dangling(t) || ends_dangling(t) || trailing_conjunction_re().is_match(t);
    }

    false
}

fn first_word(t: &str) -> Option<String> {
    t.split_whitespace()
        .next()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
}

fn last_word(t: &str) -> Option<String> {
    t.split_whitespace()
        .last()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
}

fn starts_dangling(t: &str) -> bool {
    if CJK_LEADING.iter().any(|p| t.starts_with(p)) {
        return true;
    }
    // A single word is judged by the other rules.
    if t.split_whitespace().count() < 2 {
        return false;
    }
    first_word(t).is_some_and(|w| LEADING_CONNECTIVES.contains(&w.as_str()))
}

fn ends_dangling(t: &str) -> bool {
    if CJK_TRAILING.iter().any(|p| t.ends_with(p)) {
        return true;
    }
    if t.split_whitespace().count() < 2 {
        return false;
    }
    last_word(t).is_some_and(|w| TRAILING_PARTICLES.contains(&w.as_str()))
}
