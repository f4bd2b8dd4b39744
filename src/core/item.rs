//! Content item and gate annotation types.
//!
//! Items come from an ingestion collaborator. Gates never create or destroy
//! them; they only write a `GateAnnotation` and partition them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::verdict::{GateStage, RejectReason};
use crate::error::Result;

/// Annotation written onto every item a gate touches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateAnnotation {
    /// Why the item was rejected (cleared for kept items).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected_reason: Option<RejectReason>,
    /// Final stage of the item in the last gate call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gate_stage: Option<GateStage>,
    /// Label of the tier that admitted or rejected the item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gate_level: Option<String>,
    /// Density score of the body (0-100).
    pub density_score: u8,
    /// Admitted through a soft-pass or fallback path.
    pub low_confidence: bool,
    /// Split gate: passed event thresholds.
    pub event_gate_pass: bool,
    /// Split gate: member of the signal pool.
    pub signal_gate_pass: bool,
    /// Split gate: admitted to the signal pool via soft-pass or fallback.
    pub signal_soft_pass: bool,
}

impl GateAnnotation {
    /// Annotation for a kept item.
    pub fn kept(stage: GateStage, level: impl Into<String>, density_score: u8) -> Self {
        Self {
            rejected_reason: None,
            gate_stage: Some(stage),
            gate_level: Some(level.into()),
            density_score,
            ..Default::default()
        }
    }

    /// Annotation for a rejected item.
    pub fn rejected(reason: RejectReason, level: impl Into<String>, density_score: u8) -> Self {
        Self {
            rejected_reason: Some(reason),
            gate_stage: Some(GateStage::Reject),
            gate_level: Some(level.into()),
            density_score,
            ..Default::default()
        }
    }

    /// Mark the annotation as low confidence.
    pub fn low_confidence(mut self) -> Self {
        self.low_confidence = true;
        self
    }

    /// Set the split gate pool flags.
    pub fn with_split_flags(mut self, event: bool, signal: bool, soft: bool) -> Self {
        self.event_gate_pass = event;
        self.signal_gate_pass = signal;
        self.signal_soft_pass = soft;
        self
    }

    /// Whether the annotation describes a kept item.
    pub fn is_kept(&self) -> bool {
        self.gate_stage.map(|s| s.is_kept()).unwrap_or(false)
    }
}

/// Anything a gate can classify and annotate.
///
/// `annotate` may refuse (for example a read-only view over a database
/// row). Gates log the refusal and continue with the batch.
pub trait GateItem {
    /// Stable identifier.
    fn id(&self) -> &str;
    /// Short headline.
    fn title(&self) -> &str;
    /// Free text that every classifier reads.
    fn body(&self) -> &str;
    /// Write the gate's annotation onto the item.
    fn annotate(&mut self, annotation: GateAnnotation) -> Result<()>;
}

/// A news item as produced by ingestion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Opaque stable identifier.
    pub id: String,
    /// Headline.
    pub title: String,
    /// Free text body or summary.
    #[serde(default)]
    pub body: String,
    /// Source platform (e.g. "arxiv", "techcrunch").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    /// Parsed publish time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    /// Publish time as fetched, before parsing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_raw: Option<String>,
    /// When ingestion collected the item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collected_at: Option<DateTime<Utc>>,
    /// Gate output.
    #[serde(default)]
    pub annotation: GateAnnotation,
}

impl ContentItem {
    /// Create a new item.
    pub fn new(id: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body: body.into(),
            ..Default::default()
        }
    }

    /// Set the source platform.
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    /// Set the parsed publish time.
    pub fn with_published_at(mut self, at: DateTime<Utc>) -> Self {
        self.published_at = Some(at);
        self
    }

    /// Set the raw publish string.
    pub fn with_published_raw(mut self, raw: impl Into<String>) -> Self {
        self.published_raw = Some(raw.into());
        self
    }

    /// Set the collection time.
    pub fn with_collected_at(mut self, at: DateTime<Utc>) -> Self {
        self.collected_at = Some(at);
        self
    }
}

impl GateItem for ContentItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn body(&self) -> &str {
        &self.body
    }

    fn annotate(&mut self, annotation: GateAnnotation) -> Result<()> {
        self.annotation = annotation;
        Ok(())
    }
}
