//! HTTP client construction, attempt execution, and request dispatch.
mod client;
mod dispatcher;
mod execution;
mod port;
mod worker;


pub use client::{ClientSettings, build_client, validate_target_url};
pub use dispatcher::{DispatchPlan, dispatch_run};
pub use execution::HttpRequestPort;
pub use port::{AttemptTag, RequestPort};
pub use worker::{TaskSpec, run_task};
