use std::sync::Arc;

use chrono::{Local, Utc};
use clap::{ArgMatches, CommandFactory, FromArgMatches};
use tracing::{debug, info};

use crate::app::{ConsoleProgress, run_all, summary::aggregate_lines};
use crate::args::RunArgs;
use crate::config::{apply_config, load_config};
use crate::error::AppResult;
use crate::http::{HttpRequestPort, build_client, validate_target_url};
use crate::sinks::{
    CsvReportSink, finish_trace_writer, setup_trace_writer, trace::trace_file_name,
};

/// Timestamp embedded in report file names.
const REPORT_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

pub fn run() -> AppResult<()> {
    let (mut args, matches) = parse_args()?;

    crate::logger::init_logging(args.verbose);

    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, &matches, &config)?;
    }
    validate_target_url(&args.url)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(args))
}

fn parse_args() -> AppResult<(RunArgs, ArgMatches)> {
    let matches = RunArgs::command().get_matches();
    let args = RunArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}

async fn run_async(args: RunArgs) -> AppResult<()> {
    let run_config = args.run_config();
    let output = args.output_config();
    let client = build_client(&args.client_settings())?;

    let stamp = Local::now().format(REPORT_STAMP_FORMAT).to_string();
    let mut report = CsvReportSink::create(&output.report_dir, &stamp, output.compress)?;
    info!("Writing report to {}", report.path().display());

    let (trace, trace_writer) = if output.log_requests {
        let unix_secs = u64::try_from(Utc::now().timestamp()).unwrap_or(0);
        let (sink, path, handle) =
            setup_trace_writer(&output.log_dir, &trace_file_name(unix_secs)).await?;
        info!("Tracing requests to {}", path.display());
        (Some(sink), Some(handle))
    } else {
        (None, None)
    };

    info!(
        "Target {}: {} requests x {} runs, concurrency {}, {}",
        run_config.url,
        run_config.requests,
        run_config.repeat_count,
        run_config.concurrency,
        if run_config.burst {
            "burst".to_owned()
        } else {
            format!("spread over {:?}", run_config.interval)
        }
    );

    let port = Arc::new(HttpRequestPort::new(client, trace));
    let stats = run_all(&run_config, Arc::clone(&port), &mut report, &ConsoleProgress).await?;
    drop(port);

    let report_path = report.finish()?;
    if let Some(handle) = trace_writer
        && let Some(written) = finish_trace_writer(handle).await
    {
        debug!("Trace log holds {} attempts.", written);
    }

    for line in aggregate_lines(&stats, &report_path) {
        println!("{}", line);
    }
    Ok(())
}
