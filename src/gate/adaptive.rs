//! Adaptive gate.
//!
//! Pipeline per call:
//! 1. hard-reject pass (keyword, fragment, topic), independent of tier
//! 2. strict tier over the survivors
//! 3. while fewer than `min_keep_items` pass, apply the next distinct tier
//!    to items still pending
//! 4. if any relaxation happened, soft-pass threshold failures whose
//!    density clears `density_soft_pass_min`
//!
//! Kept order is strict, then each relaxed tier, then density soft-passes;
//! input order within each bucket.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::classify::{evidence_count, Classifier, ItemFacts};
use crate::config::{validate_levels, AdaptiveGateConfig};
use crate::core::{GateAnnotation, GateItem, GateLevel, GateStage, RejectReason};
use crate::error::Result;
use crate::gate::stats::{top_density, top_reasons, DensityEntry, GateStats, TOP_N};
use crate::gate::{level_label, rejected_map, write_annotation, RejectedItem};
use crate::gate::{DENSITY_SOFT_LABEL, HARD_LABEL};

/// Where one item stands while tiers are applied.
#[derive(Debug, Clone, PartialEq)]
enum Verdict {
    /// Failed a tier-independent check.
    Hard(RejectReason),
    /// Passed the tier at this index.
    Passed(usize),
    /// Failed every tier applied so far, with the latest reason.
    Pending(RejectReason),
    /// Admitted on density after failing a threshold.
    DensitySoft,
}

/// Result of one adaptive gate call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GateOutcome<T> {
    /// Kept items in priority order.
    pub kept: Vec<T>,
    /// Rejected items in input order.
    pub rejected: Vec<RejectedItem<T>>,
    /// Aggregate stats.
    pub stats: GateStats,
}

impl<T: GateItem> GateOutcome<T> {
    /// Rejected items keyed by id.
    pub fn rejected_map(&self) -> BTreeMap<String, RejectReason> {
        rejected_map(&self.rejected)
    }
}

/// Adaptive gate over a compiled classifier.
#[derive(Debug, Clone)]
pub struct AdaptiveGate<'a> {
    classifier: &'a Classifier,
    density_soft_pass_min: u8,
}

impl<'a> AdaptiveGate<'a> {
    /// Create a gate with an explicit soft-pass density threshold.
    pub fn new(classifier: &'a Classifier, density_soft_pass_min: u8) -> Self {
        Self {
            classifier,
            density_soft_pass_min,
        }
    }

    /// Create a gate from configuration.
    pub fn from_config(classifier: &'a Classifier, config: &AdaptiveGateConfig) -> Self {
        Self::new(classifier, config.density_soft_pass_min)
    }

    /// Partition items into kept and rejected.
    ///
    /// `levels` must be non-empty and ordered strictest first.
    pub fn apply<T: GateItem>(
        &self,
        items: Vec<T>,
        min_keep_items: usize,
        levels: &[GateLevel],
    ) -> Result<GateOutcome<T>> {
        validate_levels(levels)?;

        if items.is_empty() {
            return Ok(GateOutcome {
                kept: Vec::new(),
                rejected: Vec::new(),
                stats: GateStats::empty(levels[0]),
            });
        }

        let facts: Vec<ItemFacts> = items.iter().map(|i| self.classifier.measure(i)).collect();

        let mut verdicts: Vec<Verdict> = facts
            .iter()
            .map(|f| match &f.hard_reject {
                Some(reason) => Verdict::Hard(reason.clone()),
                None => match f.check(&levels[0]) {
                    Ok(()) => Verdict::Passed(0),
                    Err(reason) => Verdict::Pending(reason),
                },
            })
            .collect();

        let mut kept_count = verdicts
            .iter()
            .filter(|v| matches!(v, Verdict::Passed(_)))
            .count();
        let mut applied = 0;

        for (index, level) in levels.iter().enumerate().skip(1) {
            if kept_count >= min_keep_items {
                break;
            }
            if *level == levels[index - 1] {
                continue;
            }
            tracing::info!(
                "relaxing gate to {} {}: {} of {} kept",
                level_label(index),
                level,
                kept_count,
                min_keep_items
            );
            applied = index;
            for (verdict, f) in verdicts.iter_mut().zip(&facts) {
                if let Verdict::Pending(_) = verdict {
                    *verdict = match f.check(level) {
                        Ok(()) => {
                            kept_count += 1;
                            Verdict::Passed(index)
                        }
                        Err(reason) => Verdict::Pending(reason),
                    };
                }
            }
        }

        if applied > 0 {
            for (verdict, f) in verdicts.iter_mut().zip(&facts) {
                if let Verdict::Pending(reason) = verdict {
                    if reason.is_threshold_related() && f.density >= self.density_soft_pass_min {
                        *verdict = Verdict::DensitySoft;
                    }
                }
            }
        }

        let density_entries: Vec<DensityEntry> = items
            .iter()
            .zip(&facts)
            .map(|(item, f)| DensityEntry {
                id: item.id().to_string(),
                title: item.title().to_string(),
                density_score: f.density,
                evidence_count: evidence_count(item.body()),
            })
            .collect();

        let total = items.len();
        let final_label = level_label(applied);
        let mut tiers: Vec<Vec<T>> = (0..levels.len()).map(|_| Vec::new()).collect();
        let mut density_soft: Vec<T> = Vec::new();
        let mut rejected: Vec<RejectedItem<T>> = Vec::new();
        let mut hard_rejected = 0;

        for ((mut item, verdict), f) in items.into_iter().zip(verdicts).zip(&facts) {
            match verdict {
                Verdict::Passed(index) => {
                    let stage = if index == 0 {
                        GateStage::HardPass
                    } else {
                        GateStage::SoftPass
                    };
                    write_annotation(
                        &mut item,
                        GateAnnotation::kept(stage, level_label(index), f.density),
                    );
                    tiers[index].push(item);
                }
                Verdict::DensitySoft => {
                    write_annotation(
                        &mut item,
                        GateAnnotation::kept(GateStage::SoftPass, DENSITY_SOFT_LABEL, f.density)
                            .low_confidence(),
                    );
                    density_soft.push(item);
                }
                Verdict::Hard(reason) => {
                    hard_rejected += 1;
                    write_annotation(
                        &mut item,
                        GateAnnotation::rejected(reason.clone(), HARD_LABEL, f.density),
                    );
                    rejected.push(RejectedItem { item, reason });
                }
                Verdict::Pending(reason) => {
                    write_annotation(
                        &mut item,
                        GateAnnotation::rejected(reason.clone(), final_label.as_str(), f.density),
                    );
                    rejected.push(RejectedItem { item, reason });
                }
            }
        }

        let passed_strict = tiers[0].len();
        let passed_relaxed: usize = tiers[1..].iter().map(Vec::len).sum();
        let passed_density_soft = density_soft.len();

        let mut kept: Vec<T> = tiers.into_iter().flatten().collect();
        kept.extend(density_soft);

        let stats = GateStats {
            total,
            hard_rejected,
            passed_strict,
            passed_relaxed,
            passed_density_soft,
            kept: kept.len(),
            rejected: rejected.len(),
            rejection_reasons: top_reasons(rejected.iter().map(|r| &r.reason), TOP_N),
            level_used: applied + 1,
            level: levels[applied],
            top_density: top_density(density_entries, TOP_N),
        };

        tracing::debug!(
            "adaptive gate: total={} kept={} rejected={} strict={} relaxed={} density_soft={} level_used={}",
            stats.total,
            stats.kept,
            stats.rejected,
            stats.passed_strict,
            stats.passed_relaxed,
            stats.passed_density_soft,
            stats.level_used
        );

        Ok(GateOutcome {
            kept,
            rejected,
            stats,
        })
    }
}

/// Run the adaptive gate with the configured keep count and tiers.
pub fn apply_adaptive_gate<T: GateItem>(
    classifier: &Classifier,
    config: &AdaptiveGateConfig,
    items: Vec<T>,
) -> Result<GateOutcome<T>> {
    AdaptiveGate::from_config(classifier, config).apply(items, config.min_keep_items, &config.levels)
}
