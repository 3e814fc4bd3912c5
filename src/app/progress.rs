use std::time::Duration;

use crate::metrics::RunStats;

use super::summary::{format_secs, run_lines};

/// Observer of run lifecycle events.
pub trait ProgressPort {
    fn run_started(&self, run_id: u64, total_runs: u64);
    fn run_completed(&self, stats: &RunStats);
    fn pausing(&self, delay: Duration);
}

/// Prints progress lines to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleProgress;

impl ProgressPort for ConsoleProgress {
    fn run_started(&self, run_id: u64, _total_runs: u64) {
        println!("Starting test run #{}", run_id);
    }

    fn run_completed(&self, stats: &RunStats) {
        for line in run_lines(stats) {
            println!("{}", line);
        }
    }

    fn pausing(&self, delay: Duration) {
        println!("Waiting {} before next run...", format_secs(delay));
    }
}
