use clap::{ArgAction, Parser};
use std::time::Duration;

use crate::domain::RunConfig;
use crate::http::ClientSettings;
use crate::sinks::config::OutputConfig;

use super::defaults::{
    DEFAULT_CONCURRENCY, DEFAULT_INTERVAL, DEFAULT_LOG_DIR, DEFAULT_MAX_RETRIES,
    DEFAULT_REPEAT_COUNT, DEFAULT_REPEAT_DELAY, DEFAULT_REPORT_DIR, DEFAULT_REQUEST_TIMEOUT,
    DEFAULT_REQUESTS, DEFAULT_URL,
};
use super::parsers::{
    parse_bool_env, parse_duration_arg, parse_positive_u64, parse_positive_usize,
};
use super::types::{PositiveU64, PositiveUsize};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Async HTTP load generator - bounded-concurrency dispatch, per-request retries, latency percentiles, and CSV reports across repeated runs."
)]
pub struct RunArgs {
    /// Target URL for the load test
    #[arg(long, short, env = "URL", default_value = DEFAULT_URL)]
    pub url: String,

    /// Number of requests issued per run
    #[arg(long, short = 'n', env = "REQUESTS", default_value = DEFAULT_REQUESTS)]
    pub requests: u64,

    /// Maximum number of requests attempting at the same time
    #[arg(
        long,
        short = 'c',
        env = "CONCURRENCY",
        default_value = DEFAULT_CONCURRENCY,
        value_parser = parse_positive_usize
    )]
    pub concurrency: PositiveUsize,

    /// Window over which request starts are spread when not in burst mode (supports ms/s/m/h, bare numbers are seconds)
    #[arg(
        long,
        env = "INTERVAL",
        default_value = DEFAULT_INTERVAL,
        value_parser = parse_duration_arg
    )]
    pub interval: Duration,

    /// Start requests as fast as the concurrency limit allows
    #[arg(long, env = "BURST", value_parser = parse_bool_env)]
    pub burst: bool,

    /// Retries per request after the first failed attempt
    #[arg(long = "max-retries", env = "MAX_RETRIES", default_value = DEFAULT_MAX_RETRIES)]
    pub max_retries: u32,

    /// Number of sequential runs
    #[arg(
        long = "repeat-count",
        env = "REPEAT_COUNT",
        default_value = DEFAULT_REPEAT_COUNT,
        value_parser = parse_positive_u64
    )]
    pub repeat_count: PositiveU64,

    /// Pause between consecutive runs (supports ms/s/m/h, bare numbers are seconds)
    #[arg(
        long = "repeat-delay",
        env = "REPEAT_DELAY",
        default_value = DEFAULT_REPEAT_DELAY,
        value_parser = parse_duration_arg
    )]
    pub repeat_delay: Duration,

    /// Gzip-compress the CSV report
    #[arg(long, env = "COMPRESS", value_parser = parse_bool_env)]
    pub compress: bool,

    /// Dump every attempt's request and response to a trace log
    #[arg(long = "log-requests", env = "LOG_REQUESTS", value_parser = parse_bool_env)]
    pub log_requests: bool,

    /// Verify TLS certificates (set to false for self-signed targets)
    #[arg(
        long = "verify-tls",
        env = "VERIFY_TLS",
        action = ArgAction::Set,
        default_value = "true",
        value_parser = parse_bool_env
    )]
    pub verify_tls: bool,

    /// Per-request client timeout (supports ms/s/m/h)
    #[arg(
        long = "timeout",
        env = "REQUEST_TIMEOUT",
        default_value = DEFAULT_REQUEST_TIMEOUT,
        value_parser = parse_duration_arg
    )]
    pub request_timeout: Duration,

    /// Directory for CSV reports
    #[arg(long = "report-dir", env = "REPORT_DIR", default_value = DEFAULT_REPORT_DIR)]
    pub report_dir: String,

    /// Directory for request trace logs
    #[arg(long = "log-dir", env = "LOG_DIR", default_value = DEFAULT_LOG_DIR)]
    pub log_dir: String,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,

    /// Path to a TOML or JSON config file
    #[arg(long, env = "SURGE_CONFIG")]
    pub config: Option<String>,
}

impl RunArgs {
    #[must_use]
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            url: self.url.clone(),
            requests: self.requests,
            concurrency: self.concurrency.get(),
            interval: self.interval,
            burst: self.burst,
            max_retries: self.max_retries,
            repeat_count: self.repeat_count.get(),
            repeat_delay: self.repeat_delay,
        }
    }

    #[must_use]
    pub const fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            timeout: self.request_timeout,
            verify_tls: self.verify_tls,
        }
    }

    #[must_use]
    pub fn output_config(&self) -> OutputConfig {
        OutputConfig {
            report_dir: self.report_dir.clone().into(),
            log_dir: self.log_dir.clone().into(),
            compress: self.compress,
            log_requests: self.log_requests,
        }
    }
}
