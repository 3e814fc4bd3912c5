use async_trait::async_trait;

use crate::error::AttemptError;

/// Identifies one attempt for tracing and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptTag {
    pub run_id: u64,
    pub request_id: u64,
    pub attempt: u32,
}

/// Issues exactly one network request per call.
#[async_trait]
pub trait RequestPort: Send + Sync {
    /// Performs a single attempt against `url` and returns the response status.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::Transport` when no response was received and
    /// `AttemptError::Status` for statuses of 400 and above. A request that
    /// cannot be built yields `AttemptError::Setup`, which is not retried.
    async fn attempt(&self, url: &str, tag: AttemptTag) -> Result<u16, AttemptError>;
}
