use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::{
    fs::File,
    io::{AsyncWriteExt, BufWriter},
    sync::mpsc,
    task::JoinHandle,
};
use tracing::warn;

use crate::error::{AppError, AppResult, SinkError};

const TRACE_CHANNEL_CAPACITY: usize = 10_000;
const TRACE_BUFFER_SIZE: usize = 64 * 1024;

/// Request/response dump of a single attempt.
#[derive(Debug, Clone)]
pub struct AttemptTrace {
    pub run_id: u64,
    pub request_id: u64,
    pub attempt: u32,
    pub request: String,
    pub response: String,
}

impl AttemptTrace {
    fn render(&self, out: &mut String) -> std::fmt::Result {
        writeln!(
            out,
            "=== run={} request={} attempt={} ===",
            self.run_id, self.request_id, self.attempt
        )?;
        writeln!(out, ">>> {}", self.request.trim_end())?;
        writeln!(out, "<<< {}", self.response.trim_end())?;
        writeln!(out)
    }
}

/// Non-blocking handle to the trace writer task. A full channel drops the
/// entry rather than stalling the attempt.
#[derive(Debug, Clone)]
pub struct TraceSink {
    sender: mpsc::Sender<AttemptTrace>,
    dropped: Arc<AtomicU64>,
}

impl TraceSink {
    #[must_use]
    pub fn new(sender: mpsc::Sender<AttemptTrace>) -> Self {
        Self {
            sender,
            dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn send(&self, trace: AttemptTrace) -> bool {
        match self.sender.try_send(trace) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        }
    }

    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

#[must_use]
pub fn trace_file_name(unix_secs: u64) -> String {
    format!("results_{}.log", unix_secs)
}

/// Creates the trace log and spawns the task that writes entries to it.
/// The task ends once every `TraceSink` clone is dropped and yields the
/// number of entries written.
///
/// # Errors
///
/// Returns an error when the log directory or file cannot be created.
pub async fn setup_trace_writer(
    dir: &Path,
    file_name: &str,
) -> AppResult<(TraceSink, PathBuf, JoinHandle<AppResult<u64>>)> {
    tokio::fs::create_dir_all(dir).await.map_err(|err| {
        AppError::sink(SinkError::CreateDir {
            path: dir.to_path_buf(),
            source: err,
        })
    })?;
    let path = dir.join(file_name);
    let file = File::create(&path).await.map_err(|err| {
        AppError::sink(SinkError::CreateTrace {
            path: path.clone(),
            source: err,
        })
    })?;

    let (trace_tx, trace_rx) = mpsc::channel(TRACE_CHANNEL_CAPACITY);
    let sink = TraceSink::new(trace_tx);
    let dropped = Arc::clone(&sink.dropped);
    let handle = tokio::spawn(write_traces(file, trace_rx, dropped));
    Ok((sink, path, handle))
}

/// Waits for the trace writer and reports how many entries it wrote.
/// Writer failures are logged and otherwise ignored so they never change
/// the outcome of a run.
pub async fn finish_trace_writer(handle: JoinHandle<AppResult<u64>>) -> Option<u64> {
    match handle.await {
        Ok(Ok(written)) => Some(written),
        Ok(Err(err)) => {
            warn!("Trace log is incomplete: {}", err);
            None
        }
        Err(err) => {
            warn!("Trace writer task failed: {}", err);
            None
        }
    }
}

async fn write_traces(
    file: File,
    mut trace_rx: mpsc::Receiver<AttemptTrace>,
    dropped: Arc<AtomicU64>,
) -> AppResult<u64> {
    let mut writer = BufWriter::with_capacity(TRACE_BUFFER_SIZE, file);
    let mut buffer = String::with_capacity(TRACE_BUFFER_SIZE);
    let mut written: u64 = 0;

    while let Some(trace) = trace_rx.recv().await {
        if let Err(err) = trace.render(&mut buffer) {
            warn!("Failed to format trace entry: {}", err);
            buffer.clear();
            continue;
        }
        writer
            .write_all(buffer.as_bytes())
            .await
            .map_err(|err| AppError::sink(SinkError::WriteTrace { source: err }))?;
        buffer.clear();
        written = written.saturating_add(1);
    }

    writer
        .flush()
        .await
        .map_err(|err| AppError::sink(SinkError::WriteTrace { source: err }))?;

    let lost = dropped.load(Ordering::Relaxed);
    if lost > 0 {
        warn!("Trace log dropped {} entries under load.", lost);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::{AttemptTrace, finish_trace_writer, setup_trace_writer, trace_file_name};
    use crate::error::{AppError, AppResult, SinkError};

    fn run_async_test<F>(future: F) -> AppResult<()>
    where
        F: std::future::Future<Output = AppResult<()>>,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(future)
    }

    #[test]
    fn trace_writer_persists_entries_until_sinks_drop() -> AppResult<()> {
        run_async_test(async {
            let dir = tempdir()?;
            let logs = dir.path().join("logs");
            let (sink, path, handle) = setup_trace_writer(&logs, &trace_file_name(42)).await?;
            for attempt in 0..2 {
                let sent = sink.send(AttemptTrace {
                    run_id: 1,
                    request_id: 7,
                    attempt,
                    request: "GET http://localhost/ HTTP/1.1\n".to_owned(),
                    response: "HTTP/1.1 503 Service Unavailable\n".to_owned(),
                });
                if !sent {
                    return Err(AppError::sink("Trace channel closed early"));
                }
            }
            drop(sink);

            let written = handle.await??;
            if written != 2 {
                return Err(AppError::sink(format!("Expected 2 entries, got {}", written)));
            }
            let content = tokio::fs::read_to_string(&path).await?;
            if !content.contains("=== run=1 request=7 attempt=1 ===") {
                return Err(AppError::sink("Missing second attempt header"));
            }
            if !content.contains(">>> GET http://localhost/ HTTP/1.1") {
                return Err(AppError::sink("Missing request dump"));
            }
            if !content.contains("<<< HTTP/1.1 503 Service Unavailable") {
                return Err(AppError::sink("Missing response dump"));
            }
            if path.file_name().and_then(|name| name.to_str()) != Some("results_42.log") {
                return Err(AppError::sink("Unexpected trace file name"));
            }
            Ok(())
        })
    }

    #[test]
    fn failed_trace_writer_is_absorbed() -> AppResult<()> {
        run_async_test(async {
            let failing = tokio::spawn(async {
                Err::<u64, _>(AppError::sink(SinkError::WriteTrace {
                    source: std::io::Error::other("disk full"),
                }))
            });
            if finish_trace_writer(failing).await.is_some() {
                return Err(AppError::sink("A failed writer should report no count"));
            }

            let healthy = tokio::spawn(async { Ok::<u64, AppError>(3) });
            if finish_trace_writer(healthy).await != Some(3) {
                return Err(AppError::sink("Expected the written count"));
            }
            Ok(())
        })
    }
}
