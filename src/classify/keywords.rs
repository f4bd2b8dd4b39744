//! Keyword alternation matcher.
//!
//! A keyword list is compiled once into a single case-insensitive regex.
//! Keywords are sorted longest first before compiling so a short keyword
//! ("model") never shadows a longer one that starts at the same position
//! ("model card"). ASCII word edges get ASCII-only `\b` anchors, so a
//! Han character next to an ASCII keyword counts as a word edge; CJK edges
//! get no anchor, since ideographic text has no spaces between words.

use regex::Regex;
use std::collections::BTreeSet;

use crate::error::{GateError, Result};

/// Compiled keyword list.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    regex: Option<Regex>,
    keywords: Vec<String>,
}

impl KeywordMatcher {
    /// Compile a keyword list.
    ///
    /// Blank entries are skipped and duplicates (case-insensitive) collapse.
    /// An empty list yields a matcher that never matches.
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Result<Self> {
        Self::compile(keywords, true)
    }

    /// Compile a keyword list that matches case exactly.
    ///
    /// For proper names that collide with ordinary words ("MATH", "BBH").
    pub fn case_sensitive<S: AsRef<str>>(keywords: &[S]) -> Result<Self> {
        Self::compile(keywords, false)
    }

    fn compile<S: AsRef<str>>(keywords: &[S], ignore_case: bool) -> Result<Self> {
        let mut seen = BTreeSet::new();
        let mut ordered: Vec<String> = keywords
            .iter()
            .map(|k| k.as_ref().trim().to_string())
            .filter(|k| !k.is_empty())
            .filter(|k| {
                if ignore_case {
                    seen.insert(k.to_lowercase())
                } else {
                    seen.insert(k.clone())
                }
            })
            .collect();

        // Longest first, then lexicographic so the pattern is deterministic.
        ordered.sort_by(|a, b| {
            b.chars()
                .count()
                .cmp(&a.chars().count())
                .then_with(|| a.cmp(b))
        });

        if ordered.is_empty() {
            return Ok(Self {
                regex: None,
                keywords: ordered,
            });
        }

        let alternation = ordered
            .iter()
            .map(|k| anchored(k))
            .collect::<Vec<_>>()
            .join("|");
        let flags = if ignore_case { "(?i)" } else { "" };
        let pattern = format!("{}(?:{})", flags, alternation);
        let regex = Regex::new(&pattern)
            .map_err(|e| GateError::config(format!("keyword pattern failed to compile: {}", e)))?;

        Ok(Self {
            regex: Some(regex),
            keywords: ordered,
        })
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.regex.is_none()
    }

    /// Keywords in match priority order.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Whether any keyword occurs in the text.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.as_ref().is_some_and(|re| re.is_match(text))
    }

    /// Total non-overlapping occurrences.
    pub fn count_matches(&self, text: &str) -> usize {
        self.regex
            .as_ref()
            .map(|re| re.find_iter(text).count())
            .unwrap_or(0)
    }

    /// Distinct keywords found, lowercased.
    pub fn matched_terms(&self, text: &str) -> BTreeSet<String> {
        match &self.regex {
            Some(re) => re
                .find_iter(text)
                .map(|m| m.as_str().to_lowercase())
                .collect(),
            None => BTreeSet::new(),
        }
    }

    /// Byte ranges of every occurrence.
    pub fn find_spans(&self, text: &str) -> Vec<(usize, usize)> {
        match &self.regex {
            Some(re) => re.find_iter(text).map(|m| (m.start(), m.end())).collect(),
            None => Vec::new(),
        }
    }
}

/// Escape a keyword and add ASCII word-boundary anchors on ASCII word edges.
fn anchored(keyword: &str) -> String {
    let escaped = regex::escape(keyword);
    let starts_word = keyword
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric());
    let ends_word = keyword
        .chars()
        .last()
        .is_some_and(|c| c.is_ascii_alphanumeric());
    format!(
        "{}{}{}",
        if starts_word { r"(?-u:\b)" } else { "" },
        escaped,
        if ends_word { r"(?-u:\b)" } else { "" }
    )
}
