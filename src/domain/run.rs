use std::time::Duration;

/// Immutable description of the load to generate, built once by the loader
/// before the first run and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub url: String,
    pub requests: u64,
    pub concurrency: usize,
    pub interval: Duration,
    pub burst: bool,
    pub max_retries: u32,
    pub repeat_count: u64,
    pub repeat_delay: Duration,
}

impl RunConfig {
    /// Delay inserted between successive task starts.
    ///
    /// Zero in burst mode, when there is nothing to pace, or when the
    /// interval is zero.
    #[must_use]
    pub fn pacing_delay(&self) -> Duration {
        if self.burst || self.requests == 0 {
            return Duration::ZERO;
        }
        let per_task_nanos = self
            .interval
            .as_nanos()
            .checked_div(u128::from(self.requests))
            .unwrap_or(0);
        Duration::from_nanos(u64::try_from(per_task_nanos).unwrap_or(u64::MAX))
    }

    /// Requests issued across every run.
    #[must_use]
    pub const fn total_requests(&self) -> u64 {
        self.requests.saturating_mul(self.repeat_count)
    }
}
