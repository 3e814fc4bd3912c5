use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::error::AppResult;
use crate::sinks::RecordSink;

use super::aggregator::Aggregator;
use super::types::{RequestResult, RunStats};

/// Upper bound on preallocated sample capacity for very large runs.
const MAX_PREALLOCATED_SAMPLES: usize = 1_000_000;
/// Progress is logged every time this share (in percent) of the run completes.
const PROGRESS_STEP_PERCENT: u64 = 10;

#[derive(Debug)]
pub struct RunOutcome {
    pub stats: RunStats,
    pub aggregator: Aggregator,
}

/// Drains every result of one run, forwarding each to `sink` exactly once.
///
/// The stream ends when the dispatcher and every worker have dropped their
/// senders, i.e. once every task of the run has reported. Percentiles are
/// only computed after that point.
///
/// # Errors
///
/// Returns an error when the record sink fails; the run is abandoned.
pub async fn collect_run(
    run_id: u64,
    expected: u64,
    run_start: Instant,
    mut results_rx: mpsc::Receiver<RequestResult>,
    sink: &mut dyn RecordSink,
) -> AppResult<RunOutcome> {
    let capacity = usize::try_from(expected)
        .unwrap_or(MAX_PREALLOCATED_SAMPLES)
        .min(MAX_PREALLOCATED_SAMPLES);
    let mut aggregator = Aggregator::with_capacity(capacity);
    let progress_step = expected
        .saturating_mul(PROGRESS_STEP_PERCENT)
        .checked_div(100)
        .unwrap_or(0)
        .max(1);

    while let Some(result) = results_rx.recv().await {
        sink.write_record(run_id, &result)?;
        aggregator.append(&result);

        let seen = aggregator.total();
        if seen.checked_rem(progress_step) == Some(0) {
            debug!(
                "Run {} progress: {}/{} done, {} failed",
                run_id,
                seen,
                expected,
                aggregator.failure_count()
            );
        }
    }
    sink.flush()?;

    if aggregator.total() != expected {
        warn!(
            "Run {} collected {} results, expected {}.",
            run_id,
            aggregator.total(),
            expected
        );
    }

    aggregator.add_wall_clock(run_start.elapsed());
    let stats = aggregator.run_stats(run_id);
    Ok(RunOutcome { stats, aggregator })
}
