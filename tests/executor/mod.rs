use crate::support::FakeClient;
use probe_cli::executor::execute;
use probe_cli::model::{OutputFile, TestSpec, TestStatus};
use std::path::PathBuf;

fn spec_for(task: &str) -> TestSpec {
    TestSpec {
        name: "demo".to_string(),
        description: String::new(),
        task: task.to_string(),
        timeout_secs: 5,
        model: "fake-model".to_string(),
        input_files: Vec::new(),
        expected_output: None,
        file_path: PathBuf::from("tests/demo.md"),
    }
}

#[test]
fn successful_task_passes() {
    let client = FakeClient::with_output_files(vec![OutputFile {
        id: "f1".to_string(),
        file_name: "report.txt".to_string(),
    }]);

    let outcome = execute(&client, &spec_for("open the page"));
    assert_eq!(outcome.status, TestStatus::Passed);
    assert_eq!(outcome.output.as_deref(), Some("done"));
    assert_eq!(outcome.task_id.as_deref(), Some("ok"));
    assert_eq!(outcome.output_files.len(), 1);
    assert!(outcome.error.is_none());
    assert!(outcome.duration_seconds >= 0.0);
}

#[test]
fn submission_failure_fails_with_message() {
    let outcome = execute(&FakeClient::default(), &spec_for("submit-fails"));
    assert_eq!(outcome.status, TestStatus::Failed);
    assert!(outcome.task_id.is_none());
    assert!(outcome.duration_seconds >= 0.0);

    let error = outcome.error.expect("error message");
    assert!(!error.is_empty());
    assert!(error.contains("submit task"));
}

#[test]
fn stream_ending_without_terminal_status_is_a_timeout() {
    let outcome = execute(&FakeClient::default(), &spec_for("never-finishes"));
    assert_eq!(outcome.status, TestStatus::Failed);
    assert_eq!(outcome.task_id.as_deref(), Some("never-finishes"));
    assert!(outcome.error.expect("error message").contains("timed out"));
}

#[test]
fn retrieval_failure_after_terminal_status_fails() {
    let outcome = execute(&FakeClient::default(), &spec_for("fetch-fails"));
    assert_eq!(outcome.status, TestStatus::Failed);
    assert!(outcome.error.expect("error message").contains("fetch result"));
}

#[test]
fn stream_error_fails_the_attempt() {
    let outcome = execute(&FakeClient::default(), &spec_for("stream-breaks"));
    assert_eq!(outcome.status, TestStatus::Failed);
    assert!(
        outcome
            .error
            .expect("error message")
            .contains("connection reset")
    );
}
