use crate::app_error::AppError;
use crate::artifacts;
use crate::ci;
use crate::client::ExecutionClient;
use crate::config::Config;
use crate::executor;
use crate::locator;
use crate::model::{Report, TestOutcome, TestSpec, TestStatus};
use crate::output;
use crate::parser::{self, ParseFailure};
use crate::report;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Sequences the whole run: locate, parse, execute, save artifacts,
/// aggregate, report, and apply the exit-code policy.
pub fn run(cfg: &Config, client: &dyn ExecutionClient) -> Result<(), AppError> {
    let files = locator::find_test_files(&cfg.test_dir).map_err(AppError::fatal)?;

    println!(
        "{} found {} test file(s) in {}",
        output::info("i"),
        output::number(&files.len().to_string()),
        output::command(&cfg.test_dir.display().to_string())
    );

    let results = run_all(cfg, client, &files);
    let report = report::summarize(results);

    output::print_summary(io::stdout().lock(), &report)
        .map_err(|e| AppError::fatal(format!("print summary: {e}")))?;

    match report::write_report(&report, &cfg.results_file) {
        Ok(()) => println!(
            "{} results saved to: {}",
            output::info("i"),
            output::command(&cfg.results_file.display().to_string())
        ),
        Err(err) => eprintln!("{} failed to save results: {err}", output::warning("warn")),
    }

    ci::publish(&report, &cfg.results_file);

    exit_policy(&report, cfg.fail_on_error)
}

/// Runs every discovered document strictly in order. A document that
/// fails to parse occupies its discovery position as an `error` outcome
/// instead of being dropped.
pub fn run_all(cfg: &Config, client: &dyn ExecutionClient, files: &[PathBuf]) -> Vec<TestOutcome> {
    let mut results = Vec::with_capacity(files.len());

    for file in files {
        results.push(run_one(cfg, client, file));
    }

    results
}

fn run_one(cfg: &Config, client: &dyn ExecutionClient, file: &Path) -> TestOutcome {
    let spec = match read_and_parse(cfg, file) {
        Ok(spec) => spec,
        Err(failure) => {
            eprintln!("{} {failure}", output::failure("fail"));
            return TestOutcome::parse_error(document_name(file), file.display().to_string());
        }
    };

    println!();
    println!(
        "{} running test: {}",
        output::info("i"),
        output::bold(&spec.name)
    );
    println!("{} file: {}", output::muted("."), spec.file_path.display());
    if !spec.description.is_empty() {
        println!("{} {}", output::muted("."), spec.description);
    }

    let outcome = executor::execute(client, &spec);

    if outcome.status == TestStatus::Passed && cfg.save_outputs {
        artifacts::save_outputs(client, &cfg.output_dir, &outcome.name, &outcome.output_files);
    }

    outcome
}

fn read_and_parse(cfg: &Config, file: &Path) -> Result<TestSpec, ParseFailure> {
    let bytes = fs::read(file).map_err(|e| ParseFailure {
        file_path: file.to_path_buf(),
        message: format!("read document: {e}"),
    })?;

    parser::parse(file, &bytes, cfg)
}

fn document_name(file: &Path) -> String {
    file.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "invalid".to_string())
}

fn exit_policy(report: &Report, fail_on_error: bool) -> Result<(), AppError> {
    let summary = &report.summary;

    if summary.errors > 0 {
        return Err(AppError::fatal("some tests encountered errors"));
    }

    if summary.failed > 0 {
        if fail_on_error {
            return Err(AppError::test_failure("some tests failed"));
        }

        println!(
            "{} tests failed but fail-on-error is disabled",
            output::warning("warn")
        );
        return Ok(());
    }

    if summary.total > 0 {
        println!("{} all tests passed", output::success("ok"));
    }

    Ok(())
}
