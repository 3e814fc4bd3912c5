use thiserror::Error;

use super::{ConfigError, HttpError, SinkError, ValidationError};

/// Every error that can end the process. Failed attempts are not in here:
/// they are folded into request results by the worker.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid argument: {0}")]
    Validation(#[from] ValidationError),
    #[error("Config file error: {0}")]
    Config(#[from] ConfigError),
    #[error("HTTP setup error: {0}")]
    Http(#[from] HttpError),
    #[error("Output error: {0}")]
    Sink(#[from] SinkError),
    #[error("Command line error: {source}")]
    Cli {
        #[from]
        source: clap::Error,
    },
    #[error("Request task failed: {source}")]
    Task {
        #[from]
        source: tokio::task::JoinError,
    },
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation(error: impl Into<ValidationError>) -> Self {
        Self::Validation(error.into())
    }

    pub fn config(error: impl Into<ConfigError>) -> Self {
        Self::Config(error.into())
    }

    pub fn http(error: impl Into<HttpError>) -> Self {
        Self::Http(error.into())
    }

    pub fn sink(error: impl Into<SinkError>) -> Self {
        Self::Sink(error.into())
    }
}
