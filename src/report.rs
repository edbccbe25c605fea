use crate::model::{Report, Summary, TestOutcome, TestStatus};
use std::fs;
use std::path::Path;
use time::OffsetDateTime;

/// Pure reduction of the final outcome sequence into the run report.
pub fn summarize(results: Vec<TestOutcome>) -> Report {
    let total = results.len();
    let passed = count_status(&results, TestStatus::Passed);
    let failed = count_status(&results, TestStatus::Failed);
    let errors = count_status(&results, TestStatus::Error);

    Report {
        summary: Summary {
            total,
            passed,
            failed,
            errors,
            success_rate: format_success_rate(passed, total),
        },
        results,
        generated_at: OffsetDateTime::now_utc(),
    }
}

pub fn format_success_rate(passed: usize, total: usize) -> String {
    if total == 0 {
        return "0%".to_string();
    }

    format!("{:.1}%", passed as f64 / total as f64 * 100.0)
}

pub fn write_report(report: &Report, path: &Path) -> Result<(), String> {
    let json =
        serde_json::to_vec_pretty(report).map_err(|e| format!("serialize report: {e}"))?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .map_err(|e| format!("create report directory {}: {e}", parent.display()))?;
    }

    fs::write(path, json).map_err(|e| format!("write {}: {e}", path.display()))
}

fn count_status(results: &[TestOutcome], status: TestStatus) -> usize {
    results.iter().filter(|r| r.status == status).count()
}
