//! Run sequencing and console reporting.
mod orchestrator;
mod progress;
pub mod summary;


pub use orchestrator::run_all;
pub use progress::{ConsoleProgress, ProgressPort};
