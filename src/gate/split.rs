//! Split gate.
//!
//! One pass producing two pools from the same items:
//! - event pool: items clearing the event thresholds
//! - signal pool: event items plus items clearing the more permissive
//!   signal thresholds, a density-backed soft-pass, or the starvation guard
//!
//! The starvation guard runs after every item is classified. If the signal
//! pool is empty it promotes the densest fallback candidates so downstream
//! consumers are not starved when input quality is uniformly weak.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::classify::{Classifier, ItemFacts};
use crate::config::{SplitFloors, SplitGateConfig};
use crate::core::{GateAnnotation, GateItem, GateLevel, GateStage, RejectReason};
use crate::error::{GateError, Result};
use crate::gate::stats::{top_reasons, SplitGateStats, TOP_N};
use crate::gate::{rejected_map, write_annotation, RejectedItem, HARD_LABEL};

const EVENT_LABEL: &str = "event";
const SIGNAL_LABEL: &str = "signal";
const SIGNAL_SOFT_LABEL: &str = "signal_soft";
const SIGNAL_FALLBACK_LABEL: &str = "signal_fallback";

/// Per-item decision before the starvation guard.
#[derive(Debug, Clone, PartialEq)]
enum Decision {
    Hard(RejectReason),
    Event,
    Signal { event_reason: RejectReason },
    SignalSoft { event_reason: RejectReason },
    /// Not admitted yet; eligible for promotion.
    Fallback { reason: RejectReason },
    Reject { reason: RejectReason },
    /// Fallback candidate promoted by the guard.
    Promoted { event_reason: RejectReason },
}

/// Result of one split gate call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitOutcome<T> {
    /// Items clearing the event thresholds.
    pub event_pool: Vec<T>,
    /// Event items, signal passes, soft passes, then fallback promotions.
    pub signal_pool: Vec<T>,
    /// Rejected items in input order.
    pub rejected: Vec<RejectedItem<T>>,
    /// Aggregate stats.
    pub stats: SplitGateStats,
}

impl<T: GateItem> SplitOutcome<T> {
    /// Rejected items keyed by id.
    pub fn rejected_map(&self) -> BTreeMap<String, RejectReason> {
        rejected_map(&self.rejected)
    }
}

/// Split gate over a compiled classifier.
#[derive(Debug, Clone)]
pub struct SplitGate<'a> {
    classifier: &'a Classifier,
    floors: &'a SplitFloors,
}

impl<'a> SplitGate<'a> {
    /// Create a split gate with soft-pass and fallback floors.
    pub fn new(classifier: &'a Classifier, floors: &'a SplitFloors) -> Self {
        Self { classifier, floors }
    }

    /// Partition items into the event pool, the signal pool, and rejects.
    ///
    /// Event items are cloned into both pools. `signal` must not be stricter
    /// than `event` on either threshold.
    pub fn apply<T: GateItem + Clone>(
        &self,
        items: Vec<T>,
        event: &GateLevel,
        signal: &GateLevel,
    ) -> Result<SplitOutcome<T>> {
        if !signal.is_looser_or_equal(event) {
            return Err(GateError::config(format!(
                "signal level {} must not be stricter than event level {}",
                signal, event
            )));
        }

        let facts: Vec<ItemFacts> = items.iter().map(|i| self.classifier.measure(i)).collect();
        let mut decisions: Vec<Decision> = facts
            .iter()
            .map(|f| self.decide(f, event, signal))
            .collect();

        let pool_empty = !decisions.iter().any(|d| {
            matches!(
                d,
                Decision::Event | Decision::Signal { .. } | Decision::SignalSoft { .. }
            )
        });

        // Candidate indices, densest first, input order among ties
        let mut candidates: Vec<usize> = decisions
            .iter()
            .enumerate()
            .filter(|(_, d)| matches!(d, Decision::Fallback { .. }))
            .map(|(i, _)| i)
            .collect();
        candidates.sort_by(|&a, &b| facts[b].density.cmp(&facts[a].density));

        let mut promoted_order: Vec<usize> = Vec::new();
        if pool_empty && !candidates.is_empty() {
            promoted_order = candidates
                .iter()
                .copied()
                .take(self.floors.max_fallback_promotions)
                .collect();
            tracing::info!(
                "signal pool empty, promoting {} of {} fallback candidates",
                promoted_order.len(),
                candidates.len()
            );
        }

        for (index, decision) in decisions.iter_mut().enumerate() {
            if let Decision::Fallback { reason } = decision {
                let reason = reason.clone();
                *decision = if promoted_order.contains(&index) {
                    let event_reason = facts[index]
                        .check(event)
                        .err()
                        .unwrap_or(RejectReason::RejectedByGate);
                    Decision::Promoted { event_reason }
                } else {
                    Decision::Reject { reason }
                };
            }
        }

        let total = items.len();
        let mut event_pool: Vec<T> = Vec::new();
        let mut signal_pool: Vec<T> = Vec::new();
        let mut promoted: Vec<Option<T>> = vec![None; promoted_order.len()];
        let mut rejected: Vec<RejectedItem<T>> = Vec::new();
        let mut event_reasons: Vec<RejectReason> = Vec::new();
        let mut hard_rejected = 0;
        let mut signal_soft_passed = 0;

        for (index, ((mut item, decision), f)) in
            items.into_iter().zip(decisions).zip(&facts).enumerate()
        {
            match decision {
                Decision::Event => {
                    write_annotation(
                        &mut item,
                        GateAnnotation::kept(GateStage::EventPass, EVENT_LABEL, f.density)
                            .with_split_flags(true, true, false),
                    );
                    event_pool.push(item.clone());
                    signal_pool.push(item);
                }
                Decision::Signal { event_reason } => {
                    write_annotation(
                        &mut item,
                        GateAnnotation::kept(GateStage::SignalPass, SIGNAL_LABEL, f.density)
                            .with_split_flags(false, true, false),
                    );
                    event_reasons.push(event_reason);
                    signal_pool.push(item);
                }
                Decision::SignalSoft { event_reason } => {
                    write_annotation(
                        &mut item,
                        GateAnnotation::kept(GateStage::SignalPass, SIGNAL_SOFT_LABEL, f.density)
                            .low_confidence()
                            .with_split_flags(false, true, true),
                    );
                    event_reasons.push(event_reason);
                    signal_soft_passed += 1;
                    signal_pool.push(item);
                }
                Decision::Promoted { event_reason } => {
                    write_annotation(
                        &mut item,
                        GateAnnotation::kept(
                            GateStage::SignalPass,
                            SIGNAL_FALLBACK_LABEL,
                            f.density,
                        )
                        .low_confidence()
                        .with_split_flags(false, true, true),
                    );
                    event_reasons.push(event_reason);
                    if let Some(rank) = promoted_order.iter().position(|&i| i == index) {
                        promoted[rank] = Some(item);
                    }
                }
                Decision::Hard(reason) => {
                    hard_rejected += 1;
                    write_annotation(
                        &mut item,
                        GateAnnotation::rejected(reason.clone(), HARD_LABEL, f.density)
                            .with_split_flags(false, false, false),
                    );
                    rejected.push(RejectedItem { item, reason });
                }
                Decision::Reject { reason } | Decision::Fallback { reason } => {
                    write_annotation(
                        &mut item,
                        GateAnnotation::rejected(reason.clone(), SIGNAL_LABEL, f.density)
                            .with_split_flags(false, false, false),
                    );
                    rejected.push(RejectedItem { item, reason });
                }
            }
        }

        let fallback_promoted = promoted_order.len();
        signal_pool.extend(promoted.into_iter().flatten());

        let stats = SplitGateStats {
            total,
            hard_rejected,
            event_passed: event_pool.len(),
            signal_passed: signal_pool.len(),
            signal_soft_passed,
            fallback_promoted,
            rejected: rejected.len(),
            rejection_reasons: top_reasons(rejected.iter().map(|r| &r.reason), TOP_N),
            event_rejection_reasons: top_reasons(&event_reasons, TOP_N),
            event_level: *event,
            signal_level: *signal,
        };

        tracing::debug!(
            "split gate: total={} event={} signal={} soft={} fallback={} rejected={}",
            stats.total,
            stats.event_passed,
            stats.signal_passed,
            stats.signal_soft_passed,
            stats.fallback_promoted,
            stats.rejected
        );

        Ok(SplitOutcome {
            event_pool,
            signal_pool,
            rejected,
            stats,
        })
    }

    /// Classify one item against both tiers and the floors.
    fn decide(&self, f: &ItemFacts, event: &GateLevel, signal: &GateLevel) -> Decision {
        if let Some(reason) = &f.hard_reject {
            return Decision::Hard(reason.clone());
        }

        // Both checks always run; the event reason is kept for diagnostics.
        let event_check = f.check(event);
        let signal_check = f.check(signal);

        let event_reason = match event_check {
            Ok(()) => return Decision::Event,
            Err(reason) => reason,
        };
        let signal_reason = match signal_check {
            Ok(()) => return Decision::Signal { event_reason },
            Err(reason) => reason,
        };

        let floors = self.floors;
        if signal_reason.is_threshold_related()
            && f.length >= floors.soft_min_length(signal)
            && f.sentences >= floors.soft_min_sentences(signal)
            && f.density >= floors.soft_density_min
        {
            return Decision::SignalSoft { event_reason };
        }

        if f.length >= floors.fallback_min_length(signal)
            && f.sentences >= floors.fallback_min_sentences
            && f.density >= floors.fallback_density_min
        {
            return Decision::Fallback {
                reason: signal_reason,
            };
        }

        Decision::Reject {
            reason: signal_reason,
        }
    }
}

/// Run the split gate with the configured tiers and floors.
pub fn apply_split_gate<T: GateItem + Clone>(
    classifier: &Classifier,
    config: &SplitGateConfig,
    items: Vec<T>,
) -> Result<SplitOutcome<T>> {
    SplitGate::new(classifier, &config.floors).apply(items, &config.event, &config.signal)
}
