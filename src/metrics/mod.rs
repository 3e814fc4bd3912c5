//! Per-request results, run statistics, and latency aggregation.
mod aggregator;
mod collector;
mod types;


pub use aggregator::{Aggregator, LatencySample, nearest_rank};
pub use collector::{RunOutcome, collect_run};
pub use types::{AggregateStats, Percentiles, RequestResult, RunStats};
