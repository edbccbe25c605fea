use crate::model::{Report, TestStatus};
use crate::output::{bold, failure, format_seconds, muted, number, success, warning};
use std::io::Write;

pub fn print_summary(mut w: impl Write, report: &Report) -> std::io::Result<()> {
    let summary = &report.summary;

    writeln!(w)?;
    writeln!(w, "{}", bold("Test summary"))?;
    writeln!(w, "  total:        {}", number(&summary.total.to_string()))?;
    writeln!(w, "  passed:       {}", success(&summary.passed.to_string()))?;
    writeln!(w, "  failed:       {}", failure(&summary.failed.to_string()))?;
    writeln!(w, "  errors:       {}", warning(&summary.errors.to_string()))?;
    writeln!(w, "  success rate: {}", number(&summary.success_rate))?;

    if report.results.is_empty() {
        return Ok(());
    }

    writeln!(w)?;

    for outcome in &report.results {
        let marker = match outcome.status {
            TestStatus::Passed => success("ok"),
            TestStatus::Failed => failure("fail"),
            TestStatus::Error => warning("err"),
            TestStatus::Pending => muted("pending"),
        };

        writeln!(
            w,
            "  {marker} {} ({})",
            bold(&outcome.name),
            format_seconds(outcome.duration_seconds)
        )?;

        if let Some(error) = &outcome.error {
            writeln!(w, "      {}", muted(error))?;
        }
    }

    Ok(())
}
