//! Content gates.
//!
//! A gate measures every item once, folds per-item verdicts into partitions,
//! writes a [`GateAnnotation`] onto each item, and reports aggregate stats.
//!
//! - [`AdaptiveGate`]: strict tier first, relaxing tier by tier while too
//!   few items survive, with a density soft-pass for near misses.
//! - [`SplitGate`]: one pass producing an event pool and a more permissive
//!   signal pool, with a starvation guard for the signal pool.

pub mod adaptive;
pub mod split;
pub mod stats;

pub use adaptive::{apply_adaptive_gate, AdaptiveGate, GateOutcome};
pub use split::{apply_split_gate, SplitGate, SplitOutcome};
pub use stats::{top_reasons, DensityEntry, GateStats, SplitGateStats, TOP_N};

use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::{GateAnnotation, GateItem, RejectReason};
use crate::error::FailOpen;

/// Label for a hard reject.
pub const HARD_LABEL: &str = "hard";
/// Label for a density soft-pass admission.
pub const DENSITY_SOFT_LABEL: &str = "density_soft";

/// Label of an adaptive tier by index: `strict`, `relaxed`, `relaxed_<n>`.
pub fn level_label(index: usize) -> String {
    match index {
        0 => "strict".to_string(),
        1 => "relaxed".to_string(),
        n => format!("relaxed_{}", n),
    }
}

/// A rejected item with the reason it was rejected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedItem<T> {
    /// The item, annotated.
    pub item: T,
    /// Why it was rejected.
    pub reason: RejectReason,
}

/// Map rejected items by id.
///
/// Items sharing an id collapse to the last one seen.
pub fn rejected_map<T: GateItem>(rejected: &[RejectedItem<T>]) -> BTreeMap<String, RejectReason> {
    rejected
        .iter()
        .map(|r| (r.item.id().to_string(), r.reason.clone()))
        .collect()
}

/// Write an annotation, logging and continuing if the item refuses it.
pub(crate) fn write_annotation<T: GateItem>(item: &mut T, annotation: GateAnnotation) {
    let context = format!("annotating item {}", item.id());
    item.annotate(annotation).fail_open_default(&context);
}
