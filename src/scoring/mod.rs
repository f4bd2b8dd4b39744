//! Ranking of gated items.

pub mod frontier;

pub use frontier::{
    best_timestamp, parse_timestamp, recency_score, FrontierScore, FrontierScorer, ScoredItem,
};
