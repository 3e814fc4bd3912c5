use std::time::Duration;

use super::types::{AggregateStats, Percentiles, RequestResult, RunStats};

const PERCENT_DIVISOR: u64 = 100;
const PERCENTILE_P50: u64 = 50;
const PERCENTILE_P90: u64 = 90;
const PERCENTILE_P99: u64 = 99;

/// Latency values in milliseconds. Sorting is deferred until percentiles
/// are requested and is skipped when the values are already ordered.
#[derive(Debug, Default, Clone)]
pub struct LatencySample {
    values: Vec<u64>,
    sorted: bool,
}

impl LatencySample {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
            sorted: true,
        }
    }

    pub fn push(&mut self, latency_ms: u64) {
        if self
            .values
            .last()
            .is_some_and(|last| *last > latency_ms)
        {
            self.sorted = false;
        }
        self.values.push(latency_ms);
    }

    pub fn merge(&mut self, mut other: LatencySample) {
        if other.values.is_empty() {
            return;
        }
        if self.values.is_empty() {
            *self = other;
            return;
        }
        self.sorted = false;
        self.values.append(&mut other.values);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sorts the sample in place and returns the ordered values.
    pub fn finalize(&mut self) -> &[u64] {
        if !self.sorted {
            self.values.sort_unstable();
            self.sorted = true;
        }
        &self.values
    }

    pub fn percentiles(&mut self) -> Percentiles {
        let sorted = self.finalize();
        Percentiles {
            p50: nearest_rank(sorted, PERCENTILE_P50),
            p90: nearest_rank(sorted, PERCENTILE_P90),
            p99: nearest_rank(sorted, PERCENTILE_P99),
        }
    }
}

/// Nearest-rank percentile over an ascending slice: the element at index
/// `floor(percent / 100 * len)`, clamped to the last element. Empty input
/// yields 0.
#[must_use]
pub fn nearest_rank(sorted: &[u64], percent: u64) -> u64 {
    let Some(last) = sorted.last() else {
        return 0;
    };
    let len = u64::try_from(sorted.len()).unwrap_or(u64::MAX);
    let index = len
        .saturating_mul(percent)
        .checked_div(PERCENT_DIVISOR)
        .unwrap_or(0);
    usize::try_from(index)
        .ok()
        .and_then(|idx| sorted.get(idx))
        .copied()
        .unwrap_or(*last)
}

/// Success/failure counters plus the latency sample they were built from.
///
/// Owned by exactly one component at a time: the collector while a run is
/// draining, then the orchestrator which absorbs it into its cross-run
/// total.
#[derive(Debug, Default)]
pub struct Aggregator {
    success_count: u64,
    failure_count: u64,
    wall_clock: Duration,
    sample: LatencySample,
}

impl Aggregator {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sample: LatencySample::with_capacity(capacity),
            ..Self::default()
        }
    }

    pub fn append(&mut self, result: &RequestResult) {
        if result.is_success() {
            self.success_count = self.success_count.saturating_add(1);
        } else {
            self.failure_count = self.failure_count.saturating_add(1);
        }
        self.sample.push(result.duration_ms());
    }

    pub fn add_wall_clock(&mut self, elapsed: Duration) {
        self.wall_clock = self.wall_clock.saturating_add(elapsed);
    }

    pub fn absorb(&mut self, other: Aggregator) {
        self.success_count = self.success_count.saturating_add(other.success_count);
        self.failure_count = self.failure_count.saturating_add(other.failure_count);
        self.wall_clock = self.wall_clock.saturating_add(other.wall_clock);
        self.sample.merge(other.sample);
    }

    #[must_use]
    pub const fn success_count(&self) -> u64 {
        self.success_count
    }

    #[must_use]
    pub const fn failure_count(&self) -> u64 {
        self.failure_count
    }

    #[must_use]
    pub const fn total(&self) -> u64 {
        self.success_count.saturating_add(self.failure_count)
    }

    #[must_use]
    pub fn sample_len(&self) -> usize {
        self.sample.len()
    }

    pub fn percentiles(&mut self) -> Percentiles {
        self.sample.percentiles()
    }

    pub fn run_stats(&mut self, run_id: u64) -> RunStats {
        RunStats {
            run_id,
            success_count: self.success_count,
            failure_count: self.failure_count,
            latency: self.percentiles(),
            wall_clock: self.wall_clock,
        }
    }

    pub fn aggregate_stats(&mut self, runs: u64, total_requests: u64) -> AggregateStats {
        AggregateStats {
            runs,
            total_requests,
            success_count: self.success_count,
            failure_count: self.failure_count,
            latency: self.percentiles(),
            wall_clock: self.wall_clock,
        }
    }
}
