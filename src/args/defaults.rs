pub(crate) const DEFAULT_USER_AGENT: &str = concat!(
    "surge-loadtest/",
    env!("CARGO_PKG_VERSION"),
    " (compatible; +https://example.com)"
);

pub(super) const DEFAULT_URL: &str = "https://www.google.com/generate_204";
pub(super) const DEFAULT_REQUESTS: &str = "1000";
pub(super) const DEFAULT_CONCURRENCY: &str = "100";
pub(super) const DEFAULT_INTERVAL: &str = "5";
pub(super) const DEFAULT_MAX_RETRIES: &str = "2";
pub(super) const DEFAULT_REPEAT_COUNT: &str = "1";
pub(super) const DEFAULT_REPEAT_DELAY: &str = "5";
pub(super) const DEFAULT_REQUEST_TIMEOUT: &str = "15s";
pub(super) const DEFAULT_REPORT_DIR: &str = "reports";
pub(super) const DEFAULT_LOG_DIR: &str = "logs";
