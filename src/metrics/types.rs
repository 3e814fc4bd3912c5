use std::time::Duration;

/// Terminal outcome of one task. Status and error describe the last attempt
/// only; `duration` spans every attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestResult {
    pub request_id: u64,
    pub status: u16,
    pub error: Option<String>,
    pub duration: Duration,
    pub retries: u32,
}

impl RequestResult {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.error.is_none()
    }

    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        u64::try_from(self.duration.as_millis()).unwrap_or(u64::MAX)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Percentiles {
    pub p50: u64,
    pub p90: u64,
    pub p99: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub run_id: u64,
    pub success_count: u64,
    pub failure_count: u64,
    pub latency: Percentiles,
    pub wall_clock: Duration,
}

impl RunStats {
    #[must_use]
    pub const fn total_requests(&self) -> u64 {
        self.success_count.saturating_add(self.failure_count)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateStats {
    pub runs: u64,
    pub total_requests: u64,
    pub success_count: u64,
    pub failure_count: u64,
    pub latency: Percentiles,
    pub wall_clock: Duration,
}
