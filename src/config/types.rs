use std::time::Duration;

use serde::Deserialize;

use crate::args::parsers::parse_duration_arg;
use crate::error::AppResult;

/// Values read from a `surge.toml` / `surge.json` file. Every field is
/// optional; flags and environment variables take precedence.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub url: Option<String>,
    pub requests: Option<u64>,
    pub concurrency: Option<usize>,
    pub interval: Option<DurationValue>,
    pub burst: Option<bool>,
    pub max_retries: Option<u32>,
    pub repeat_count: Option<u64>,
    pub repeat_delay: Option<DurationValue>,
    pub compress: Option<bool>,
    pub log_requests: Option<bool>,
    pub verify_tls: Option<bool>,
    pub timeout: Option<DurationValue>,
    pub report_dir: Option<String>,
    pub log_dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> AppResult<Duration> {
        match self {
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => parse_duration_arg(text),
        }
    }
}
