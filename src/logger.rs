use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Filter used when neither `SURGE_LOG` nor `RUST_LOG` is set.
const fn default_directive(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

/// Picks the first well-formed directive from `SURGE_LOG`, then `RUST_LOG`,
/// falling back to the verbosity default.
fn resolve_filter(surge_log: Option<String>, rust_log: Option<String>, verbose: bool) -> EnvFilter {
    surge_log
        .or(rust_log)
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new(default_directive(verbose)))
}

/// Installs the global subscriber. Log lines go to stderr so stdout only
/// carries run progress and the final summary.
pub fn init_logging(verbose: bool) {
    let filter = resolve_filter(
        std::env::var("SURGE_LOG").ok(),
        std::env::var("RUST_LOG").ok(),
        verbose,
    );

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global default subscriber: {}", err);
    }
}
