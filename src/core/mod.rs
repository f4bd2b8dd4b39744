//! Core types for newsgate.
//!
//! Content items, the annotation gates write onto them, and the tagged
//! outcomes (levels, stages, reject reasons) every classifier stage returns.

pub mod item;
pub mod verdict;

pub use item::{ContentItem, GateAnnotation, GateItem};
pub use verdict::{GateLevel, GateStage, RejectReason};
