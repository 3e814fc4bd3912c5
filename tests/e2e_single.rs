mod support_single;

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::Output;

use flate2::read::GzDecoder;
use tempfile::tempdir;

use support_single::{run_surge, spawn_http_server};

const HEADER: &str = "RunID,RequestID,Status,Error,Duration(ms),Retries";

fn describe(output: &Output) -> String {
    format!(
        "stdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

fn find_file(dir: &Path, suffix: &str) -> Result<PathBuf, String> {
    let entries = fs::read_dir(dir).map_err(|err| format!("read_dir failed: {}", err))?;
    for entry in entries {
        let path = entry
            .map_err(|err| format!("dir entry failed: {}", err))?
            .path();
        let matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with("results_") && name.ends_with(suffix));
        if matches {
            return Ok(path);
        }
    }
    Err(format!("no results_*{} in {}", suffix, dir.display()))
}

fn rows(report: &str) -> Result<Vec<Vec<String>>, String> {
    let mut lines = report.lines();
    if lines.next() != Some(HEADER) {
        return Err(format!("unexpected report header in:\n{}", report));
    }
    Ok(lines
        .map(|line| line.split(',').map(str::to_owned).collect())
        .collect())
}

#[test]
fn e2e_single_repeated_runs_write_csv_report() -> Result<(), String> {
    let (url, _server) = spawn_http_server()?;
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let report_dir = dir.path().join("reports");

    let output = run_surge(
        dir.path(),
        &[
            ("URL", format!("{}/ok", url)),
            ("REQUESTS", "5".to_owned()),
            ("CONCURRENCY", "2".to_owned()),
            ("BURST", "true".to_owned()),
            ("REPEAT_COUNT", "2".to_owned()),
            ("REPEAT_DELAY", "0".to_owned()),
            ("REPORT_DIR", report_dir.to_string_lossy().into_owned()),
        ],
    )?;
    if !output.status.success() {
        return Err(describe(&output));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    for expected in [
        "Starting test run #1",
        "Run 2 completed: Requests=5, Success=5, Failed=0",
        "Waiting 0.00s before next run...",
        "All test runs completed.",
        "Total requests: 10",
        "Succeeded: 10",
        "Failed: 0",
        "Report saved to: ",
    ] {
        if !stdout.contains(expected) {
            return Err(format!("missing '{}'\n{}", expected, describe(&output)));
        }
    }
    if stdout.matches("Waiting").count() != 1 {
        return Err(format!("expected exactly one pause\n{}", describe(&output)));
    }

    let report_path = find_file(&report_dir, ".csv")?;
    let report = fs::read_to_string(&report_path).map_err(|err| format!("read report failed: {}", err))?;
    let rows = rows(&report)?;
    if rows.len() != 10 {
        return Err(format!("expected 10 rows, got {}", rows.len()));
    }
    for run_id in ["1", "2"] {
        let mut ids: Vec<u64> = rows
            .iter()
            .filter(|row| row.first().map(String::as_str) == Some(run_id))
            .filter_map(|row| row.get(1).and_then(|id| id.parse().ok()))
            .collect();
        ids.sort_unstable();
        if ids != [1, 2, 3, 4, 5] {
            return Err(format!("run {} request ids: {:?}", run_id, ids));
        }
    }
    if rows
        .iter()
        .any(|row| row.get(2).map(String::as_str) != Some("200") || row.get(3).is_some_and(|err| !err.is_empty()))
    {
        return Err(format!("expected only successes:\n{}", report));
    }
    Ok(())
}

#[test]
fn e2e_single_failures_are_retried_traced_and_compressed() -> Result<(), String> {
    let (url, _server) = spawn_http_server()?;
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let report_dir = dir.path().join("reports");
    let log_dir = dir.path().join("logs");

    let output = run_surge(
        dir.path(),
        &[
            ("URL", format!("{}/fail", url)),
            ("REQUESTS", "4".to_owned()),
            ("CONCURRENCY", "4".to_owned()),
            ("INTERVAL", "0".to_owned()),
            ("MAX_RETRIES", "1".to_owned()),
            ("COMPRESS", "yes".to_owned()),
            ("LOG_REQUESTS", "1".to_owned()),
            ("REPORT_DIR", report_dir.to_string_lossy().into_owned()),
            ("LOG_DIR", log_dir.to_string_lossy().into_owned()),
        ],
    )?;
    if !output.status.success() {
        return Err(describe(&output));
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.contains("Failed: 4") || !stdout.contains("Succeeded: 0") {
        return Err(describe(&output));
    }

    let report_path = find_file(&report_dir, ".csv.gz")?;
    let compressed = fs::read(&report_path).map_err(|err| format!("read report failed: {}", err))?;
    let mut report = String::new();
    GzDecoder::new(compressed.as_slice())
        .read_to_string(&mut report)
        .map_err(|err| format!("gunzip failed: {}", err))?;
    let rows = rows(&report)?;
    if rows.len() != 4 {
        return Err(format!("expected 4 rows, got {}", rows.len()));
    }
    for row in &rows {
        let status = row.get(2).map(String::as_str);
        let error = row.get(3).map(String::as_str);
        let retries = row.get(5).map(String::as_str);
        if status != Some("500") || error != Some("HTTP 500: nope") || retries != Some("1") {
            return Err(format!("unexpected row {:?}", row));
        }
    }

    let trace_path = find_file(&log_dir, ".log")?;
    let trace = fs::read_to_string(&trace_path).map_err(|err| format!("read trace failed: {}", err))?;
    if trace.matches("=== run=1 ").count() != 8 {
        return Err(format!("expected 8 traced attempts:\n{}", trace));
    }
    Ok(())
}

#[test]
fn e2e_single_rejects_unsupported_scheme() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let output = run_surge(
        dir.path(),
        &[
            ("URL", "ftp://example.com/file".to_owned()),
            ("REQUESTS", "1".to_owned()),
        ],
    )?;
    if output.status.success() {
        return Err(format!("expected failure\n{}", describe(&output)));
    }
    if dir.path().join("reports").exists() {
        return Err("no report should be created for invalid input".to_owned());
    }
    Ok(())
}
