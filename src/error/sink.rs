use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to create directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to create report '{path}': {source}")]
    CreateReport {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write report record: {source}")]
    WriteRecord {
        #[source]
        source: csv::Error,
    },
    #[error("Failed to finish report '{path}': {source}")]
    FinishReport {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to create trace log '{path}': {source}")]
    CreateTrace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write trace log: {source}")]
    WriteTrace {
        #[source]
        source: std::io::Error,
    },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
