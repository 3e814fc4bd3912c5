use std::path::Path;
use std::time::Duration;

use crate::metrics::{AggregateStats, Percentiles, RunStats};

/// Milliseconds per hundredth of a second.
const MS_PER_CENTI: u128 = 10;
/// Half of `MS_PER_CENTI`, used for round-half-up.
const HALF_CENTI_MS: u128 = 5;
/// Hundredths per second.
const CENTIS_PER_SEC: u128 = 100;

pub fn run_lines(stats: &RunStats) -> Vec<String> {
    vec![
        format!(
            "Run {} completed: Requests={}, Success={}, Failed={}, Time={}",
            stats.run_id,
            stats.total_requests(),
            stats.success_count,
            stats.failure_count,
            format_secs(stats.wall_clock)
        ),
        latency_line(stats.latency),
    ]
}

pub fn aggregate_lines(stats: &AggregateStats, report_path: &Path) -> Vec<String> {
    vec![
        "All test runs completed.".to_owned(),
        format!("Total requests: {}", stats.total_requests),
        format!("Succeeded: {}", stats.success_count),
        format!("Failed: {}", stats.failure_count),
        latency_line(stats.latency),
        format!(
            "Total wall-clock time for all runs: {}",
            format_secs(stats.wall_clock)
        ),
        format!("Report saved to: {}", report_path.display()),
    ]
}

pub fn latency_line(latency: Percentiles) -> String {
    format!(
        "Latency(ms): p50={}, p90={}, p99={}",
        latency.p50, latency.p90, latency.p99
    )
}

/// Seconds with two decimals, rounded half up.
#[must_use]
pub fn format_secs(duration: Duration) -> String {
    let centis = duration
        .as_millis()
        .saturating_add(HALF_CENTI_MS)
        .checked_div(MS_PER_CENTI)
        .unwrap_or(0);
    let whole = centis.checked_div(CENTIS_PER_SEC).unwrap_or(0);
    let fraction = centis.checked_rem(CENTIS_PER_SEC).unwrap_or(0);
    format!("{}.{:02}s", whole, fraction)
}
