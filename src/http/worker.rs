use std::sync::Arc;

use tokio::time::Instant;
use tracing::debug;

use crate::error::AttemptError;
use crate::metrics::RequestResult;

use super::port::{AttemptTag, RequestPort};

/// Parameters of one task. Workers keep no other state.
#[derive(Debug, Clone)]
pub struct TaskSpec {
    pub run_id: u64,
    pub request_id: u64,
    pub url: Arc<str>,
    pub max_retries: u32,
}

enum Terminal {
    Succeeded { status: u16 },
    ExhaustedFailed { error: AttemptError },
}

/// Runs up to `1 + max_retries` attempts and returns the single result of
/// the task.
///
/// Failed attempts are retried immediately, except when the request could
/// not be built at all. Status and error come from the last attempt only;
/// the duration covers every attempt.
pub async fn run_task<P>(port: &P, spec: &TaskSpec) -> RequestResult
where
    P: RequestPort + ?Sized,
{
    let started = Instant::now();
    let mut attempt: u32 = 0;

    let terminal = loop {
        let tag = AttemptTag {
            run_id: spec.run_id,
            request_id: spec.request_id,
            attempt,
        };
        match port.attempt(&spec.url, tag).await {
            Ok(status) => break Terminal::Succeeded { status },
            Err(error) if !error.is_retryable() => {
                debug!(
                    "Request {} cannot be sent, not retrying: {}",
                    spec.request_id, error
                );
                break Terminal::ExhaustedFailed { error };
            }
            Err(error) if attempt >= spec.max_retries => {
                debug!(
                    "Request {} failed after {} attempts: {}",
                    spec.request_id,
                    attempt.saturating_add(1),
                    error
                );
                break Terminal::ExhaustedFailed { error };
            }
            Err(error) => {
                debug!(
                    "Request {} attempt {} failed, retrying: {}",
                    spec.request_id, attempt, error
                );
                attempt = attempt.saturating_add(1);
            }
        }
    };

    let duration = started.elapsed();
    let (status, error) = match terminal {
        Terminal::Succeeded { status } => (status, None),
        Terminal::ExhaustedFailed { error } => (error.status(), Some(error.to_string())),
    };

    RequestResult {
        request_id: spec.request_id,
        status,
        error,
        duration,
        retries: attempt,
    }
}
