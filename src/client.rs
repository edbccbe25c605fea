use crate::model::OutputFile;
use serde::{Deserialize, Serialize};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
const POLL_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("submit task: {0}")]
    Submission(String),
    #[error("fetch result: {0}")]
    Retrieval(String),
    #[error("download file '{file_id}': {message}")]
    Artifact { file_id: String, message: String },
}

#[derive(Debug, Clone)]
pub struct TaskRequest {
    pub task: String,
    pub model: String,
    pub input_files: Vec<String>,
}

/// Identifier handed back by the remote service on submission.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    pub id: String,
}

#[derive(Debug, Clone)]
pub struct StatusEvent {
    pub status: String,
}

impl StatusEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self.status.as_str(), "finished" | "stopped")
    }
}

#[derive(Debug, Clone, Default)]
pub struct TaskResult {
    pub output: Option<String>,
    pub output_files: Vec<OutputFile>,
}

pub type StatusStream<'a> = Box<dyn Iterator<Item = Result<StatusEvent, ClientError>> + 'a>;

/// The only boundary that talks to the remote service. The executor is
/// written against this trait so tests can substitute a double.
pub trait ExecutionClient {
    fn submit(&self, request: &TaskRequest) -> Result<TaskHandle, ClientError>;

    /// Produces a finite sequence of status events. The sequence ends
    /// after a terminal (finished/stopped) event, or when `deadline`
    /// passes; the caller treats end-without-terminal as a timeout.
    fn stream_status(&self, handle: &TaskHandle, deadline: Instant) -> StatusStream<'_>;

    fn fetch_result(&self, handle: &TaskHandle) -> Result<TaskResult, ClientError>;

    fn download(&self, file_id: &str) -> Result<Vec<u8>, ClientError>;
}

#[derive(Debug, Serialize)]
struct CreateTaskBody<'a> {
    task: &'a str,
    llm: &'a str,
    #[serde(rename = "inputFiles", skip_serializing_if = "Option::is_none")]
    input_files: Option<&'a [String]>,
}

#[derive(Debug, Deserialize)]
struct TaskCreated {
    id: String,
}

#[derive(Debug, Deserialize)]
struct TaskPayload {
    status: String,
    #[serde(default)]
    output: Option<String>,
    #[serde(default, rename = "outputFiles")]
    output_files: Vec<FilePayload>,
}

#[derive(Debug, Deserialize)]
struct FilePayload {
    id: String,
    #[serde(rename = "fileName")]
    file_name: String,
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    http: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    poll_interval: Duration,
}

impl HttpClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, String> {
        let http = reqwest::blocking::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| format!("build http client: {e}"))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            poll_interval: POLL_INTERVAL,
        })
    }

    fn get_task(&self, task_id: &str) -> Result<TaskPayload, String> {
        let url = format!("{}/tasks/{task_id}", self.base_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .map_err(|e| format!("send request: {e}"))?;

        if !response.status().is_success() {
            return Err(format!("unexpected status {}", response.status().as_u16()));
        }

        response
            .json::<TaskPayload>()
            .map_err(|e| format!("decode response: {e}"))
    }
}

impl ExecutionClient for HttpClient {
    fn submit(&self, request: &TaskRequest) -> Result<TaskHandle, ClientError> {
        let body = CreateTaskBody {
            task: &request.task,
            llm: &request.model,
            input_files: if request.input_files.is_empty() {
                None
            } else {
                Some(&request.input_files)
            },
        };

        let url = format!("{}/tasks", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| ClientError::Submission(format!("send request: {e}")))?;

        if !response.status().is_success() {
            return Err(ClientError::Submission(format!(
                "unexpected status {}",
                response.status().as_u16()
            )));
        }

        let created = response
            .json::<TaskCreated>()
            .map_err(|e| ClientError::Submission(format!("decode response: {e}")))?;

        Ok(TaskHandle { id: created.id })
    }

    fn stream_status(&self, handle: &TaskHandle, deadline: Instant) -> StatusStream<'_> {
        Box::new(PollStream {
            client: self,
            task_id: handle.id.clone(),
            deadline,
            first: true,
            done: false,
        })
    }

    fn fetch_result(&self, handle: &TaskHandle) -> Result<TaskResult, ClientError> {
        let payload = self.get_task(&handle.id).map_err(ClientError::Retrieval)?;

        Ok(TaskResult {
            output: payload.output,
            output_files: payload
                .output_files
                .into_iter()
                .map(|f| OutputFile {
                    id: f.id,
                    file_name: f.file_name,
                })
                .collect(),
        })
    }

    fn download(&self, file_id: &str) -> Result<Vec<u8>, ClientError> {
        let url = format!("{}/files/{file_id}", self.base_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .map_err(|e| ClientError::Artifact {
                file_id: file_id.to_string(),
                message: format!("send request: {e}"),
            })?;

        if !response.status().is_success() {
            return Err(ClientError::Artifact {
                file_id: file_id.to_string(),
                message: format!("unexpected status {}", response.status().as_u16()),
            });
        }

        let bytes = response.bytes().map_err(|e| ClientError::Artifact {
            file_id: file_id.to_string(),
            message: format!("read body: {e}"),
        })?;

        Ok(bytes.to_vec())
    }
}

/// Bounded polling against the task endpoint. Each `next` waits at most
/// one poll interval, never past the deadline.
struct PollStream<'a> {
    client: &'a HttpClient,
    task_id: String,
    deadline: Instant,
    first: bool,
    done: bool,
}

impl Iterator for PollStream<'_> {
    type Item = Result<StatusEvent, ClientError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if !self.first {
            let now = Instant::now();
            if now >= self.deadline {
                self.done = true;
                return None;
            }
            thread::sleep(self.client.poll_interval.min(self.deadline - now));
        }
        self.first = false;

        if Instant::now() >= self.deadline {
            self.done = true;
            return None;
        }

        match self.client.get_task(&self.task_id) {
            Ok(payload) => {
                let event = StatusEvent {
                    status: payload.status,
                };
                if event.is_terminal() {
                    self.done = true;
                }
                Some(Ok(event))
            }
            Err(message) => {
                self.done = true;
                Some(Err(ClientError::Retrieval(message)))
            }
        }
    }
}
