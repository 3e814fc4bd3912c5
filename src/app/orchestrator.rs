use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::{Instant, sleep};
use tracing::info;

use crate::domain::RunConfig;
use crate::error::AppResult;
use crate::http::{DispatchPlan, RequestPort, dispatch_run};
use crate::metrics::{AggregateStats, Aggregator, RunOutcome, collect_run};
use crate::sinks::RecordSink;

use super::progress::ProgressPort;

/// Upper bound on results buffered between workers and the collector.
const MAX_RESULT_BUFFER: usize = 10_000;

/// Executes `repeat_count` runs one after another and merges their
/// statistics.
///
/// The pause of `repeat_delay` happens between consecutive runs and never
/// after the last one. Aggregate percentiles cover the union of every
/// run's samples.
///
/// # Errors
///
/// Returns the first fatal error of any run; later runs are not started.
pub async fn run_all<P, G>(
    config: &RunConfig,
    port: Arc<P>,
    sink: &mut dyn RecordSink,
    progress: &G,
) -> AppResult<AggregateStats>
where
    P: RequestPort + ?Sized + 'static,
    G: ProgressPort + ?Sized,
{
    let mut totals = Aggregator::default();

    for run_id in 1..=config.repeat_count {
        progress.run_started(run_id, config.repeat_count);
        info!("Run {}/{} started.", run_id, config.repeat_count);

        let outcome = run_once(config, run_id, Arc::clone(&port), sink).await?;
        info!(
            "Run {}/{} finished: {} ok, {} failed.",
            run_id, config.repeat_count, outcome.stats.success_count, outcome.stats.failure_count
        );
        progress.run_completed(&outcome.stats);
        totals.absorb(outcome.aggregator);

        if run_id < config.repeat_count {
            progress.pausing(config.repeat_delay);
            if !config.repeat_delay.is_zero() {
                sleep(config.repeat_delay).await;
            }
        }
    }

    Ok(totals.aggregate_stats(config.repeat_count, config.total_requests()))
}

async fn run_once<P>(
    config: &RunConfig,
    run_id: u64,
    port: Arc<P>,
    sink: &mut dyn RecordSink,
) -> AppResult<RunOutcome>
where
    P: RequestPort + ?Sized + 'static,
{
    let buffer = usize::try_from(config.requests)
        .unwrap_or(MAX_RESULT_BUFFER)
        .clamp(1, MAX_RESULT_BUFFER);
    let (results_tx, results_rx) = mpsc::channel(buffer);
    let run_start = Instant::now();

    let plan = DispatchPlan::for_run(config, run_id);
    let dispatch = dispatch_run(port, &plan, results_tx);
    let collect = collect_run(run_id, config.requests, run_start, results_rx, sink);
    let ((), outcome) = tokio::try_join!(dispatch, collect)?;
    Ok(outcome)
}
