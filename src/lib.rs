//! newsgate - adaptive content gate for news feeds
//!
//! newsgate filters a batch of collected news items down to the ones worth
//! reading. Placeholders, digests, and off-topic items are rejected outright;
//! the rest are held to length and sentence thresholds that relax tier by tier
//! when too few items survive. A split gate sorts items into an event pool
//! and a more permissive signal pool, and a frontier scorer ranks what is
//! left by recency, source authority, and content signals.

pub mod classify;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod gate;
pub mod scoring;

pub use classify::{Classifier, ItemFacts};
pub use config::Config;
pub use core::{ContentItem, GateAnnotation, GateItem, GateLevel, GateStage, RejectReason};
pub use error::{FailOpen, GateError, Result};
pub use gate::{
    apply_adaptive_gate, apply_split_gate, AdaptiveGate, DensityEntry, GateOutcome, GateStats,
    RejectedItem, SplitGate, SplitGateStats, SplitOutcome,
};
pub use scoring::{FrontierScore, FrontierScorer, ScoredItem};

// CLI commands
pub use cli::{ConfigCommand, GateCommand, ScoreCommand, SplitCommand};
