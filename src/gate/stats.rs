//! Aggregate statistics for gate calls.
//!
//! Stats are derived from the partition after every item is classified and
//! never persisted here. All types serialize to plain JSON: counts,
//! `(reason, count)` pairs, and small diagnostic lists.

use serde::Serialize;
use std::collections::HashMap;

use crate::core::{GateLevel, RejectReason};

/// Length of every top-N list in stats.
pub const TOP_N: usize = 5;

/// Adaptive gate statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GateStats {
    /// Items in.
    pub total: usize,
    /// Items rejected by keyword, fragment, or topic checks.
    pub hard_rejected: usize,
    /// Items passing the strict tier.
    pub passed_strict: usize,
    /// Items passing any relaxed tier.
    pub passed_relaxed: usize,
    /// Items admitted by the density soft-pass.
    pub passed_density_soft: usize,
    /// Items kept.
    pub kept: usize,
    /// Items rejected, hard rejects included.
    pub rejected: usize,
    /// Most frequent rejection reasons, ties in first-seen order.
    pub rejection_reasons: Vec<(String, usize)>,
    /// 1-based index of the last tier applied (1 = strict).
    pub level_used: usize,
    /// Thresholds of the last tier applied.
    pub level: GateLevel,
    /// Densest items regardless of outcome.
    pub top_density: Vec<DensityEntry>,
}

impl GateStats {
    /// Stats for an empty batch.
    pub fn empty(level: GateLevel) -> Self {
        Self {
            total: 0,
            hard_rejected: 0,
            passed_strict: 0,
            passed_relaxed: 0,
            passed_density_soft: 0,
            kept: 0,
            rejected: 0,
            rejection_reasons: Vec::new(),
            level_used: 1,
            level,
            top_density: Vec::new(),
        }
    }

    /// Whether any relaxed tier was applied.
    pub fn relaxed(&self) -> bool {
        self.level_used > 1
    }
}

/// Split gate statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitGateStats {
    /// Items in.
    pub total: usize,
    /// Items rejected by keyword, fragment, or topic checks.
    pub hard_rejected: usize,
    /// Items in the event pool.
    pub event_passed: usize,
    /// Items in the signal pool, event items included.
    pub signal_passed: usize,
    /// Signal pool items admitted by the soft-pass.
    pub signal_soft_passed: usize,
    /// Signal pool items promoted by the starvation guard.
    pub fallback_promoted: usize,
    /// Items rejected, hard rejects included.
    pub rejected: usize,
    /// Most frequent rejection reasons, ties in first-seen order.
    pub rejection_reasons: Vec<(String, usize)>,
    /// Why signal pool items missed the event pool.
    pub event_rejection_reasons: Vec<(String, usize)>,
    /// Event pool thresholds.
    pub event_level: GateLevel,
    /// Signal pool thresholds.
    pub signal_level: GateLevel,
}

/// One row of the density diagnostics list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DensityEntry {
    /// Item id.
    pub id: String,
    /// Item title.
    pub title: String,
    /// Density score of the body.
    pub density_score: u8,
    /// Distinct fact-bearing tokens in the body.
    pub evidence_count: usize,
}

/// Histogram of reasons, most frequent first, ties in first-seen order.
pub fn top_reasons<'a, I>(reasons: I, limit: usize) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a RejectReason>,
{
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for reason in reasons {
        let key = reason.to_string();
        match index.get(&key) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(key.clone(), counts.len());
                counts.push((key, 1));
            }
        }
    }

    // Stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(limit);
    counts
}

/// Top entries by density, ties in input order.
pub(crate) fn top_density(mut entries: Vec<DensityEntry>, limit: usize) -> Vec<DensityEntry> {
    entries.sort_by(|a, b| b.density_score.cmp(&a.density_score));
    entries.truncate(limit);
    entries
}
