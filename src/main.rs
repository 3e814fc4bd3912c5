mod app;
mod args;
mod config;
mod domain;
mod entry;
mod error;
mod http;
mod logger;
mod metrics;
mod sinks;

use error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
