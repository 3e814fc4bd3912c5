//! Output sinks: per-request CSV report and optional per-attempt trace log.
pub mod config;
pub mod report;
pub mod trace;

pub use report::{CsvReportSink, RecordSink};
pub use trace::{AttemptTrace, TraceSink, finish_trace_writer, setup_trace_writer};
