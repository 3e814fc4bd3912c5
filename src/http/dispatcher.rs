use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::domain::RunConfig;
use crate::error::{AppError, AppResult, HttpError};
use crate::metrics::RequestResult;

use super::port::RequestPort;
use super::worker::{TaskSpec, run_task};

/// Everything the dispatcher needs for one run.
#[derive(Debug, Clone)]
pub struct DispatchPlan {
    pub run_id: u64,
    pub requests: u64,
    pub concurrency: usize,
    pub pacing: Duration,
    pub url: Arc<str>,
    pub max_retries: u32,
}

impl DispatchPlan {
    #[must_use]
    pub fn for_run(config: &RunConfig, run_id: u64) -> Self {
        Self {
            run_id,
            requests: config.requests,
            concurrency: config.concurrency,
            pacing: config.pacing_delay(),
            url: Arc::from(config.url.as_str()),
            max_retries: config.max_retries,
        }
    }
}

/// Starts tasks `1..=requests` in ascending order and waits for all of
/// them.
///
/// A task holds an admission permit from before its first attempt until
/// its result is handed to `results_tx`, so at most `concurrency` tasks are
/// attempting at any time. With a non-zero pacing delay the loop waits that
/// long after each start before admitting the next task, so a late permit
/// never shortens the gap. Finished tasks are reaped as the loop goes.
/// `results_tx` is dropped once the last task is started, so the stream
/// closes when the last task reports.
///
/// # Errors
///
/// Returns an error when the admission gate closes or a task panics.
pub async fn dispatch_run<P>(
    port: Arc<P>,
    plan: &DispatchPlan,
    results_tx: mpsc::Sender<RequestResult>,
) -> AppResult<()>
where
    P: RequestPort + ?Sized + 'static,
{
    let gate = Arc::new(Semaphore::new(
        plan.concurrency.clamp(1, Semaphore::MAX_PERMITS),
    ));
    let mut tasks = JoinSet::new();

    debug!(
        "Run {}: dispatching {} requests, concurrency {}, pacing {:?}",
        plan.run_id, plan.requests, plan.concurrency, plan.pacing
    );

    for request_id in 1..=plan.requests {
        let permit = Arc::clone(&gate)
            .acquire_owned()
            .await
            .map_err(|err| AppError::http(HttpError::AdmissionGateClosed { source: err }))?;

        let port = Arc::clone(&port);
        let results_tx = results_tx.clone();
        let spec = TaskSpec {
            run_id: plan.run_id,
            request_id,
            url: Arc::clone(&plan.url),
            max_retries: plan.max_retries,
        };
        tasks.spawn(async move {
            let result = run_task(port.as_ref(), &spec).await;
            if results_tx.send(result).await.is_err() {
                warn!("Result for request {} dropped: collector closed.", spec.request_id);
            }
            drop(permit);
        });

        while let Some(joined) = tasks.try_join_next() {
            joined?;
        }
        if request_id < plan.requests && !plan.pacing.is_zero() {
            sleep(plan.pacing).await;
        }
    }
    drop(results_tx);

    while let Some(joined) = tasks.join_next().await {
        joined?;
    }
    Ok(())
}
