//! Semantic density scoring.
//!
//! A 0-100 proxy for how fact-dense a text is. Three sub-scores, each
//! capped on its own, are summed and clamped:
//! - numeric: years, version numbers, quantities with units or currency
//! - entity: capitalized tokens plus domain hint keywords
//! - structure: sentences beyond the first
//!
//! Density is a secondary signal. Gates use it for soft passes and fallback
//! ordering, never as the primary accept/reject check.

use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::OnceLock;

use crate::classify::keywords::KeywordMatcher;
use crate::classify::text::sentence_count;
use crate::config::DensityConfig;
use crate::error::Result;

fn numeric_res() -> &'static [Regex] {
    static RES: OnceLock<Vec<Regex>> = OnceLock::new();
    RES.get_or_init(|| {
        [
            // Years
            r"\b(?:19|20)\d{2}\b",
            // Versions
            r"\bv?\d+\.\d+(?:\.\d+)*\b",
            // Quantities with units
            r"(?i)\d+(?:[.,]\d+)?\s?(?:%|percent\b|million\b|billion\b|trillion\b|[kmbt]\b|gb\b|tb\b|ms\b|x\b|tokens?\b|params?\b|parameters\b|倍|亿|万)",
            // Currency
            r"[$€£¥]\s?\d",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("numeric signal regex must compile"))
        .collect()
    })
}

fn capitalized_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b\p{Lu}[\p{L}\p{N}]*").expect("capitalized token regex must compile")
    })
}

/// Per-component density breakdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DensityBreakdown {
    /// Numeric-signal sub-score.
    pub numeric: u32,
    /// Entity/keyword sub-score.
    pub entity: u32,
    /// Structural sub-score.
    pub structure: u32,
    /// Clamped total (0-100).
    pub total: u8,
}

/// Density scorer with compiled domain hints.
#[derive(Debug, Clone)]
pub struct DensityScorer {
    weights: DensityConfig,
    hints: KeywordMatcher,
}

impl DensityScorer {
    /// Build a scorer from weights and a domain hint list.
    pub fn new<S: AsRef<str>>(weights: DensityConfig, domain_hints: &[S]) -> Result<Self> {
        Ok(Self {
            weights,
            hints: KeywordMatcher::new(domain_hints)?,
        })
    }

    /// Density score in [0, 100].
    pub fn score(&self, text: &str) -> u8 {
        self.breakdown(text).total
    }

    /// Density score with its components.
    pub fn breakdown(&self, text: &str) -> DensityBreakdown {
        let t = text.trim();
        if t.is_empty() {
            return DensityBreakdown::default();
        }

        let w = &self.weights;

        let numeric_hits: usize = numeric_res().iter().map(|re| re.find_iter(t).count()).sum();
        let numeric = (numeric_hits as u32)
            .saturating_mul(w.numeric_weight)
            .min(w.numeric_cap);

        let capitalized = capitalized_token_re().find_iter(t).count() as u32;
        let hints = self.hints.count_matches(t) as u32;
        let entity = capitalized
            .saturating_mul(w.entity_weight)
            .saturating_add(hints.saturating_mul(w.hint_weight))
            .min(w.entity_cap);

        let extra_sentences = sentence_count(t).saturating_sub(1) as u32;
        let structure = extra_sentences
            .saturating_mul(w.sentence_weight)
            .min(w.structure_cap);

        let total = numeric.saturating_add(entity).saturating_add(structure).min(100) as u8;

        DensityBreakdown {
            numeric,
            entity,
            structure,
            total,
        }
    }
}

/// Count distinct fact-bearing tokens: numbers with units, years, versions,
/// and capitalized names.
///
/// Used for diagnostics next to the density score; repeated mentions of the
/// same fact count once.
pub fn evidence_count(text: &str) -> usize {
    let mut facts = BTreeSet::new();
    for re in numeric_res() {
        for m in re.find_iter(text) {
            facts.insert(m.as_str().to_lowercase());
        }
    }
    for m in capitalized_token_re().find_iter(text) {
        facts.insert(m.as_str().to_string());
    }
    facts.len()
}
