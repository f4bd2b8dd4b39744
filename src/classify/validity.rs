//! Content validity checks.
//!
//! One parameterized check serves every tier (strict, relaxed, event,
//! signal). Checks run in order and the first failure wins:
//! 1. hard-reject keyword
//! 2. fragment
//! 3. length
//! 4. sentence count

use crate::classify::fragment::is_fragment;
use crate::classify::text::{char_len, sentence_count};
use crate::core::{GateLevel, RejectReason};

/// Case-insensitive substring blocklist.
#[derive(Debug, Clone, Default)]
pub struct Blocklist {
    keywords: Vec<String>,
}

impl Blocklist {
    /// Build from raw keywords. Blank entries are dropped.
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Self {
        Self {
            keywords: keywords
                .iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// First blocklisted keyword found in the text, in list order.
    pub fn find(&self, text: &str) -> Option<&str> {
        if self.keywords.is_empty() {
            return None;
        }
        let lower = text.to_lowercase();
        self.keywords
            .iter()
            .find(|k| lower.contains(k.as_str()))
            .map(|k| k.as_str())
    }
}

/// Check measured length and sentence count against a tier.
pub fn check_thresholds(
    length: usize,
    sentences: usize,
    level: &GateLevel,
) -> Result<(), RejectReason> {
    if length < level.min_length {
        return Err(RejectReason::ContentTooShort);
    }
    if sentences < level.min_sentences {
        return Err(RejectReason::InsufficientSentences);
    }
    Ok(())
}

/// Validate an article body against a tier.
pub fn is_valid_article(
    text: &str,
    level: &GateLevel,
    blocklist: &Blocklist,
) -> Result<(), RejectReason> {
    if let Some(kw) = blocklist.find(text) {
        return Err(RejectReason::RejectedKeyword(kw.to_string()));
    }
    if is_fragment(text) {
        return Err(RejectReason::FragmentPlaceholder);
    }
    check_thresholds(char_len(text), sentence_count(text), level)
}
