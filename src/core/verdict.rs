//! Classification outcomes shared by every gate.
//!
//! A rejection is a value, never an error. Reasons serialize to a closed set
//! of machine-readable strings (`rejected_keyword:<kw>`, `fragment_placeholder`,
//! `content_too_short`, ...) so downstream consumers can histogram them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Gate levels
// =============================================================================

/// One quality tier's acceptance thresholds.
///
/// Lengths are measured in characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GateLevel {
    /// Minimum character count.
    pub min_length: usize,
    /// Minimum number of sentences.
    pub min_sentences: usize,
}

impl GateLevel {
    /// Create a new level.
    pub const fn new(min_length: usize, min_sentences: usize) -> Self {
        Self {
            min_length,
            min_sentences,
        }
    }

    /// Whether every threshold of `self` is at or below `other`'s.
    pub fn is_looser_or_equal(&self, other: &GateLevel) -> bool {
        self.min_length <= other.min_length && self.min_sentences <= other.min_sentences
    }
}

impl fmt::Display for GateLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(min_length={}, min_sentences={})",
            self.min_length, self.min_sentences
        )
    }
}

// =============================================================================
// Gate stage
// =============================================================================

/// Where an item ended up after a gate call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateStage {
    /// Rejected by a hard check or every tier.
    Reject,
    /// Passed the strictest tier.
    HardPass,
    /// Passed a relaxed tier or the density soft-pass.
    SoftPass,
    /// Passed the split gate's event thresholds (member of both pools).
    EventPass,
    /// Admitted to the split gate's signal pool only.
    SignalPass,
}

impl GateStage {
    /// Whether this stage means the item was kept.
    pub fn is_kept(&self) -> bool {
        !matches!(self, GateStage::Reject)
    }
}

impl fmt::Display for GateStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateStage::Reject => write!(f, "REJECT"),
            GateStage::HardPass => write!(f, "HARD_PASS"),
            GateStage::SoftPass => write!(f, "SOFT_PASS"),
            GateStage::EventPass => write!(f, "EVENT_PASS"),
            GateStage::SignalPass => write!(f, "SIGNAL_PASS"),
        }
    }
}

// =============================================================================
// Reject reasons
// =============================================================================

/// Machine-readable rejection reason.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum RejectReason {
    /// A blocklisted keyword was found (lowercased keyword attached).
    RejectedKeyword(String),
    /// Empty text, template remnant, or broken sentence fragment.
    FragmentPlaceholder,
    /// Shorter than the tier's minimum length.
    ContentTooShort,
    /// Fewer sentences than the tier requires.
    InsufficientSentences,
    /// Does not match the configured topic.
    NonAiTopic,
    /// Failed a tier and had no more specific reason on record.
    LowDensityScore,
    /// Generic gate rejection.
    RejectedByGate,
}

const KEYWORD_PREFIX: &str = "rejected_keyword:";

impl RejectReason {
    /// Whether the failure is about length or sentence count.
    ///
    /// Only these failures are eligible for density-based soft passes.
    pub fn is_threshold_related(&self) -> bool {
        matches!(
            self,
            RejectReason::ContentTooShort | RejectReason::InsufficientSentences
        )
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::RejectedKeyword(kw) => write!(f, "{}{}", KEYWORD_PREFIX, kw),
            RejectReason::FragmentPlaceholder => write!(f, "fragment_placeholder"),
            RejectReason::ContentTooShort => write!(f, "content_too_short"),
            RejectReason::InsufficientSentences => write!(f, "insufficient_sentences"),
            RejectReason::NonAiTopic => write!(f, "non_ai_topic"),
            RejectReason::LowDensityScore => write!(f, "low_density_score"),
            RejectReason::RejectedByGate => write!(f, "rejected_by_gate"),
        }
    }
}

impl FromStr for RejectReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(kw) = s.strip_prefix(KEYWORD_PREFIX) {
            return Ok(RejectReason::RejectedKeyword(kw.to_string()));
        }
        match s {
            "fragment_placeholder" => Ok(RejectReason::FragmentPlaceholder),
            "content_too_short" => Ok(RejectReason::ContentTooShort),
            "insufficient_sentences" => Ok(RejectReason::InsufficientSentences),
            "non_ai_topic" => Ok(RejectReason::NonAiTopic),
            "low_density_score" => Ok(RejectReason::LowDensityScore),
            "rejected_by_gate" => Ok(RejectReason::RejectedByGate),
            other => Err(format!("unknown reject reason: '{}'", other)),
        }
    }
}

impl From<RejectReason> for String {
    fn from(reason: RejectReason) -> Self {
        reason.to_string()
    }
}

impl TryFrom<String> for RejectReason {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
