use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;

use crate::error::{AppError, AppResult, SinkError};
use crate::metrics::RequestResult;

const REPORT_HEADER: [&str; 6] = [
    "RunID",
    "RequestID",
    "Status",
    "Error",
    "Duration(ms)",
    "Retries",
];

/// Destination for one row per completed task.
pub trait RecordSink: Send {
    /// Writes one record.
    ///
    /// # Errors
    ///
    /// Returns an error when the destination cannot be written.
    fn write_record(&mut self, run_id: u64, result: &RequestResult) -> AppResult<()>;

    /// Flushes buffered records at the end of a run.
    ///
    /// # Errors
    ///
    /// Returns an error when the destination cannot be flushed.
    fn flush(&mut self) -> AppResult<()>;
}

enum ReportWriter {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl Write for ReportWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            ReportWriter::Plain(writer) => writer.write(buf),
            ReportWriter::Gzip(writer) => writer.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            ReportWriter::Plain(writer) => writer.flush(),
            ReportWriter::Gzip(writer) => writer.flush(),
        }
    }
}

impl ReportWriter {
    fn finish(self) -> std::io::Result<()> {
        match self {
            ReportWriter::Plain(mut writer) => writer.flush(),
            ReportWriter::Gzip(encoder) => encoder.finish()?.flush(),
        }
    }
}

/// CSV report written to `results_<stamp>.csv`, or `.csv.gz` when
/// compressed.
pub struct CsvReportSink {
    writer: csv::Writer<ReportWriter>,
    path: PathBuf,
}

impl CsvReportSink {
    /// Creates the report directory and file and writes the header row.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory or file cannot be created.
    pub fn create(dir: &Path, stamp: &str, compress: bool) -> AppResult<Self> {
        std::fs::create_dir_all(dir).map_err(|err| {
            AppError::sink(SinkError::CreateDir {
                path: dir.to_path_buf(),
                source: err,
            })
        })?;
        let path = dir.join(report_file_name(stamp, compress));
        let file = File::create(&path).map_err(|err| {
            AppError::sink(SinkError::CreateReport {
                path: path.clone(),
                source: err,
            })
        })?;
        let buffered = BufWriter::new(file);
        let inner = if compress {
            ReportWriter::Gzip(GzEncoder::new(buffered, Compression::default()))
        } else {
            ReportWriter::Plain(buffered)
        };
        let mut writer = csv::Writer::from_writer(inner);
        writer
            .write_record(REPORT_HEADER)
            .map_err(|err| AppError::sink(SinkError::WriteRecord { source: err }))?;
        Ok(Self { writer, path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flushes all rows, terminates the gzip stream if any, and returns the
    /// report path.
    ///
    /// # Errors
    ///
    /// Returns an error when the remaining data cannot be written.
    pub fn finish(self) -> AppResult<PathBuf> {
        let Self { writer, path } = self;
        let inner = writer.into_inner().map_err(|err| {
            AppError::sink(SinkError::FinishReport {
                path: path.clone(),
                source: std::io::Error::new(err.error().kind(), err.error().to_string()),
            })
        })?;
        inner.finish().map_err(|err| {
            AppError::sink(SinkError::FinishReport {
                path: path.clone(),
                source: err,
            })
        })?;
        Ok(path)
    }
}

impl RecordSink for CsvReportSink {
    fn write_record(&mut self, run_id: u64, result: &RequestResult) -> AppResult<()> {
        self.writer
            .write_record([
                run_id.to_string(),
                result.request_id.to_string(),
                result.status.to_string(),
                result.error.clone().unwrap_or_default(),
                result.duration_ms().to_string(),
                result.retries.to_string(),
            ])
            .map_err(|err| AppError::sink(SinkError::WriteRecord { source: err }))
    }

    fn flush(&mut self) -> AppResult<()> {
        self.writer.flush().map_err(|err| {
            AppError::sink(SinkError::FinishReport {
                path: self.path.clone(),
                source: err,
            })
        })
    }
}

#[must_use]
pub fn report_file_name(stamp: &str, compress: bool) -> String {
    if compress {
        format!("results_{}.csv.gz", stamp)
    } else {
        format!("results_{}.csv", stamp)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;
    use std::time::Duration;

    use flate2::read::GzDecoder;
    use tempfile::tempdir;

    use super::{CsvReportSink, RecordSink, report_file_name};
    use crate::error::{AppError, AppResult};
    use crate::metrics::RequestResult;

    fn sample_results() -> Vec<RequestResult> {
        vec![
            RequestResult {
                request_id: 2,
                status: 204,
                error: None,
                duration: Duration::from_millis(12),
                retries: 0,
            },
            RequestResult {
                request_id: 1,
                status: 503,
                error: Some("HTTP 503: busy, try later".to_owned()),
                duration: Duration::from_millis(48),
                retries: 2,
            },
        ]
    }

    #[test]
    fn file_name_reflects_compression() -> AppResult<()> {
        if report_file_name("20240101_120000", false) != "results_20240101_120000.csv" {
            return Err(AppError::sink("Unexpected plain file name"));
        }
        if report_file_name("20240101_120000", true) != "results_20240101_120000.csv.gz" {
            return Err(AppError::sink("Unexpected gzip file name"));
        }
        Ok(())
    }

    #[test]
    fn plain_report_has_header_and_rows() -> AppResult<()> {
        let dir = tempdir()?;
        let reports = dir.path().join("nested").join("reports");
        let mut sink = CsvReportSink::create(&reports, "stamp", false)?;
        for result in sample_results() {
            sink.write_record(1, &result)?;
        }
        sink.flush()?;
        let path = sink.finish()?;

        let content = std::fs::read_to_string(&path)?;
        let lines: Vec<&str> = content.lines().collect();
        let expected = [
            "RunID,RequestID,Status,Error,Duration(ms),Retries",
            "1,2,204,,12,0",
            "1,1,503,\"HTTP 503: busy, try later\",48,2",
        ];
        if lines != expected {
            return Err(AppError::sink(format!("Unexpected report: {:?}", lines)));
        }
        Ok(())
    }

    #[test]
    fn gzip_report_round_trips_through_decoder() -> AppResult<()> {
        let dir = tempdir()?;
        let mut sink = CsvReportSink::create(dir.path(), "stamp", true)?;
        for result in sample_results() {
            sink.write_record(3, &result)?;
        }
        let path = sink.finish()?;
        if path.extension().and_then(|ext| ext.to_str()) != Some("gz") {
            return Err(AppError::sink("Expected .gz report"));
        }

        let file = std::fs::File::open(&path)?;
        let mut decoded = String::new();
        GzDecoder::new(file).read_to_string(&mut decoded)?;
        if !decoded.starts_with("RunID,RequestID,Status,Error,Duration(ms),Retries\n") {
            return Err(AppError::sink("Missing header in gzip report"));
        }
        if decoded.lines().count() != 3 {
            return Err(AppError::sink("Expected header plus two rows"));
        }
        Ok(())
    }
}
