use crate::client::{ExecutionClient, TaskRequest, TaskResult};
use crate::model::{TestOutcome, TestSpec, TestStatus};
use crate::output;
use std::time::{Duration, Instant};

/// Drives one spec through the remote service and returns its terminal
/// outcome. A single attempt is final: submission failures, retrieval
/// failures, and timeouts all land as `failed` with a captured message.
pub fn execute(client: &dyn ExecutionClient, spec: &TestSpec) -> TestOutcome {
    let mut outcome = TestOutcome::pending(&spec.name, spec.file_path.display().to_string());
    let wall = Instant::now();

    match attempt(client, spec, &mut outcome) {
        Ok(result) => {
            outcome.duration_seconds = wall.elapsed().as_secs_f64();
            outcome.status = TestStatus::Passed;
            outcome.output = result.output;
            outcome.output_files = result.output_files;

            println!(
                "{} test passed in {}",
                output::success("ok"),
                output::number(&output::format_seconds(outcome.duration_seconds))
            );
        }
        Err(message) => {
            outcome.duration_seconds = wall.elapsed().as_secs_f64();
            outcome.status = TestStatus::Failed;

            println!(
                "{} test failed in {}: {message}",
                output::failure("fail"),
                output::number(&output::format_seconds(outcome.duration_seconds))
            );

            outcome.error = Some(message);
        }
    }

    outcome
}

fn attempt(
    client: &dyn ExecutionClient,
    spec: &TestSpec,
    outcome: &mut TestOutcome,
) -> Result<TaskResult, String> {
    let request = TaskRequest {
        task: spec.task.clone(),
        model: spec.model.clone(),
        input_files: spec.input_files.clone(),
    };

    let handle = client.submit(&request).map_err(|e| e.to_string())?;
    outcome.task_id = Some(handle.id.clone());

    println!(
        "{} task created: {} (timeout: {}s)",
        output::info("i"),
        output::command(&handle.id),
        spec.timeout_secs
    );

    let deadline = Instant::now() + Duration::from_secs(spec.timeout_secs);
    let mut last_status: Option<String> = None;
    let mut terminal = false;

    for event in client.stream_status(&handle, deadline) {
        let event = event.map_err(|e| e.to_string())?;

        if last_status.as_deref() != Some(event.status.as_str()) {
            println!("{} status: {}", output::muted("."), event.status);
            last_status = Some(event.status.clone());
        }

        if event.is_terminal() {
            terminal = true;
            break;
        }
    }

    if !terminal {
        return Err(format!(
            "timed out after {}s waiting for task completion",
            spec.timeout_secs
        ));
    }

    client.fetch_result(&handle).map_err(|e| e.to_string())
}
