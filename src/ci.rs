use crate::model::Report;
use crate::output;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

const MULTILINE_DELIMITER: &str = "EOF";

/// Exposes selected report fields as CI outputs via the file named by
/// `GITHUB_OUTPUT`. Everything here is best-effort: failures are
/// warnings, never run failures.
pub fn publish(report: &Report, results_file: &Path) {
    let Some(path) = std::env::var_os("GITHUB_OUTPUT") else {
        return;
    };
    let path = PathBuf::from(path);

    let json = match serde_json::to_string(report) {
        Ok(json) => json,
        Err(err) => {
            eprintln!(
                "{} failed to serialize report for CI output: {err}",
                output::warning("warn")
            );
            return;
        }
    };

    let outputs = [
        ("results", json),
        ("total-tests", report.summary.total.to_string()),
        ("passed-tests", report.summary.passed.to_string()),
        ("failed-tests", report.summary.failed.to_string()),
        ("results-file", results_file.display().to_string()),
    ];

    for (name, value) in outputs {
        if let Err(err) = append_output(&path, name, &value) {
            eprintln!(
                "{} failed to set CI output '{name}': {err}",
                output::warning("warn")
            );
        }
    }
}

pub fn append_output(path: &Path, name: &str, value: &str) -> Result<(), String> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| format!("open {}: {e}", path.display()))?;

    let result = if value.contains('\n') {
        writeln!(file, "{name}<<{MULTILINE_DELIMITER}\n{value}\n{MULTILINE_DELIMITER}")
    } else {
        writeln!(file, "{name}={value}")
    };

    result.map_err(|e| format!("write {}: {e}", path.display()))
}
