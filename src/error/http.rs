use thiserror::Error;

/// Status recorded for attempts that never received a response.
pub const TRANSPORT_FAILURE_STATUS: u16 = 0;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Failed to build HTTP client: {source}")]
    BuildClientFailed {
        #[source]
        source: reqwest::Error,
    },
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Unsupported URL scheme '{scheme}'. Use http or https.")]
    UnsupportedScheme { scheme: String },
    #[error("Admission gate closed: {source}")]
    AdmissionGateClosed {
        #[source]
        source: tokio::sync::AcquireError,
    },
}

/// Failure of a single attempt. Transport and status failures are retried;
/// a request that cannot even be built is not. None of them leave the
/// worker that produced them.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AttemptError {
    #[error("{cause}")]
    Transport { cause: String },
    #[error("HTTP {status}: {snippet}")]
    Status { status: u16, snippet: String },
    #[error("request setup: {cause}")]
    Setup { cause: String },
}

impl AttemptError {
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            AttemptError::Transport { .. } | AttemptError::Setup { .. } => {
                TRANSPORT_FAILURE_STATUS
            }
            AttemptError::Status { status, .. } => *status,
        }
    }

    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        !matches!(self, AttemptError::Setup { .. })
    }

    pub(crate) fn setup(err: &reqwest::Error) -> Self {
        AttemptError::Setup {
            cause: err.to_string(),
        }
    }

    pub(crate) fn transport(err: &reqwest::Error) -> Self {
        let cause = if err.is_timeout() {
            format!("timeout: {}", err)
        } else if err.is_connect() {
            format!("connect: {}", err)
        } else {
            err.to_string()
        };
        AttemptError::Transport { cause }
    }
}
