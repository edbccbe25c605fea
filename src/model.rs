use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Pending,
    Passed,
    Failed,
    Error,
}

/// One parsed test document, ready to be submitted to the remote service.
#[derive(Debug, Clone, PartialEq)]
pub struct TestSpec {
    pub name: String,
    pub description: String,
    pub task: String,
    pub timeout_secs: u64,
    pub model: String,
    pub input_files: Vec<String>,
    pub expected_output: Option<Value>,
    pub file_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputFile {
    pub id: String,
    pub file_name: String,
}

/// Terminal record of one attempted test document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestOutcome {
    pub name: String,
    pub file_path: String,
    pub status: TestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_seconds: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub output_files: Vec<OutputFile>,
}

impl TestOutcome {
    pub fn pending(name: impl Into<String>, file_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file_path: file_path.into(),
            status: TestStatus::Pending,
            output: None,
            error: None,
            duration_seconds: 0.0,
            task_id: None,
            output_files: Vec::new(),
        }
    }

    pub fn parse_error(name: impl Into<String>, file_path: impl Into<String>) -> Self {
        let mut outcome = Self::pending(name, file_path);
        outcome.status = TestStatus::Error;
        outcome.error = Some("Failed to parse test case".to_string());
        outcome
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub success_rate: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub summary: Summary,
    pub results: Vec<TestOutcome>,
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
}
