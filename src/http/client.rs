use std::time::Duration;

use reqwest::Client;
use tracing::warn;
use url::Url;

use crate::args::DEFAULT_USER_AGENT;
use crate::error::{AppError, AppResult, HttpError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientSettings {
    pub timeout: Duration,
    pub verify_tls: bool,
}

/// Builds the pooled client shared by every worker of every run.
///
/// # Errors
///
/// Returns an error when the TLS backend or client cannot be initialised.
pub fn build_client(settings: &ClientSettings) -> AppResult<Client> {
    let mut builder = Client::builder()
        .timeout(settings.timeout)
        .user_agent(DEFAULT_USER_AGENT);

    if !settings.verify_tls {
        warn!("TLS certificate verification is disabled.");
        builder = builder.danger_accept_invalid_certs(true);
    }

    builder
        .build()
        .map_err(|err| AppError::http(HttpError::BuildClientFailed { source: err }))
}

/// Checks that the target parses and uses a scheme the client can speak.
///
/// # Errors
///
/// Returns an error for unparsable URLs and non-HTTP schemes.
pub fn validate_target_url(raw: &str) -> AppResult<Url> {
    let url = Url::parse(raw).map_err(|err| {
        AppError::http(HttpError::InvalidUrl {
            url: raw.to_owned(),
            source: err,
        })
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AppError::http(HttpError::UnsupportedScheme {
            scheme: other.to_owned(),
        })),
    }
}
