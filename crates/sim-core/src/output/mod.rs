//! Simulation Output
//!
//! Per-round metrics and run-level summaries.

pub mod metrics;

pub use metrics::{record_round, strategy_counts, RoundMetrics, RunSummary};
