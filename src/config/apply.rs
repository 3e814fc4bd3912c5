use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{PositiveU64, PositiveUsize, RunArgs};
use crate::error::{AppError, AppResult, ConfigError};

use super::types::ConfigFile;

/// Applies configuration file values to arguments that neither the command
/// line nor the environment set.
///
/// # Errors
///
/// Returns an error when a config value is out of range or malformed.
pub fn apply_config(args: &mut RunArgs, matches: &ArgMatches, config: &ConfigFile) -> AppResult<()> {
    if !is_explicit(matches, "url")
        && let Some(url) = config.url.clone()
    {
        args.url = url;
    }

    if !is_explicit(matches, "requests")
        && let Some(requests) = config.requests
    {
        args.requests = requests;
    }

    if !is_explicit(matches, "concurrency")
        && let Some(concurrency) = config.concurrency
    {
        args.concurrency = PositiveUsize::try_from(concurrency).map_err(|err| {
            AppError::config(ConfigError::OutOfRange {
                field: "concurrency",
                source: err,
            })
        })?;
    }

    if !is_explicit(matches, "interval")
        && let Some(interval) = config.interval.as_ref()
    {
        args.interval = interval.to_duration()?;
    }

    if !is_explicit(matches, "burst")
        && let Some(burst) = config.burst
    {
        args.burst = burst;
    }

    if !is_explicit(matches, "max_retries")
        && let Some(max_retries) = config.max_retries
    {
        args.max_retries = max_retries;
    }

    if !is_explicit(matches, "repeat_count")
        && let Some(repeat_count) = config.repeat_count
    {
        args.repeat_count = PositiveU64::try_from(repeat_count).map_err(|err| {
            AppError::config(ConfigError::OutOfRange {
                field: "repeat_count",
                source: err,
            })
        })?;
    }

    if !is_explicit(matches, "repeat_delay")
        && let Some(delay) = config.repeat_delay.as_ref()
    {
        args.repeat_delay = delay.to_duration()?;
    }

    if !is_explicit(matches, "compress")
        && let Some(compress) = config.compress
    {
        args.compress = compress;
    }

    if !is_explicit(matches, "log_requests")
        && let Some(log_requests) = config.log_requests
    {
        args.log_requests = log_requests;
    }

    if !is_explicit(matches, "verify_tls")
        && let Some(verify_tls) = config.verify_tls
    {
        args.verify_tls = verify_tls;
    }

    if !is_explicit(matches, "request_timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        args.request_timeout = timeout.to_duration()?;
    }

    if !is_explicit(matches, "report_dir")
        && let Some(dir) = config.report_dir.clone()
    {
        args.report_dir = dir;
    }

    if !is_explicit(matches, "log_dir")
        && let Some(dir) = config.log_dir.clone()
    {
        args.log_dir = dir;
    }

    Ok(())
}

fn is_explicit(matches: &ArgMatches, name: &str) -> bool {
    matches!(
        matches.value_source(name),
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    )
}
