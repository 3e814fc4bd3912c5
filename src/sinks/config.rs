use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub report_dir: PathBuf,
    pub log_dir: PathBuf,
    pub compress: bool,
    pub log_requests: bool,
}
