use crate::config::Config;
use crate::model::TestSpec;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static TASK_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^#{1,2}\s+task\s*$").expect("valid regex"));

/// A document that could not be turned into a test spec. Never escapes
/// the parser as anything other than this value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub file_path: PathBuf,
    pub message: String,
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file_path.display(), self.message)
    }
}

impl std::error::Error for ParseFailure {}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct Frontmatter {
    name: Option<String>,
    description: Option<String>,
    timeout: Option<u64>,
    llm_model: Option<String>,
    input_files: Vec<String>,
    expected_output: Option<Value>,
}

pub fn parse(path: &Path, bytes: &[u8], cfg: &Config) -> Result<TestSpec, ParseFailure> {
    parse_text(path, bytes, cfg).map_err(|message| ParseFailure {
        file_path: path.to_path_buf(),
        message,
    })
}

fn parse_text(path: &Path, bytes: &[u8], cfg: &Config) -> Result<TestSpec, String> {
    let text = std::str::from_utf8(bytes).map_err(|e| format!("document is not valid UTF-8: {e}"))?;

    let (metadata, body) = split_frontmatter(text)?;

    let metadata: Frontmatter = match metadata {
        Some(block) => {
            serde_yaml::from_str(block).map_err(|e| format!("invalid metadata block: {e}"))?
        }
        None => Frontmatter::default(),
    };

    let task = extract_task(body);
    if task.is_empty() {
        return Err("document has no task content".to_string());
    }

    let timeout_secs = metadata.timeout.unwrap_or(cfg.timeout_secs);
    if timeout_secs == 0 {
        return Err("timeout must be greater than zero".to_string());
    }

    let name = match metadata.name {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| "unnamed".to_string()),
    };

    Ok(TestSpec {
        name,
        description: metadata.description.unwrap_or_default(),
        task,
        timeout_secs,
        model: metadata.llm_model.unwrap_or_else(|| cfg.model.clone()),
        input_files: metadata.input_files,
        expected_output: metadata.expected_output,
        file_path: path.to_path_buf(),
    })
}

/// Splits an optional leading `---`-delimited YAML block from the body.
/// A document without one is valid; an unterminated block is not.
/// Both LF and CRLF line endings delimit the block.
fn split_frontmatter(text: &str) -> Result<(Option<&str>, &str), String> {
    let Some(rest) = text.strip_prefix("---\n").or_else(|| text.strip_prefix("---\r\n")) else {
        return Ok((None, text));
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(&['\r', '\n'][..]) == "---" {
            let block = rest[..offset].trim_end_matches(&['\r', '\n'][..]);
            return Ok((Some(block), &rest[offset + line.len()..]));
        }
        offset += line.len();
    }

    Err("unterminated metadata block".to_string())
}

/// Extracts the task text from the document body. The section under the
/// first level-1/2 "Task" heading wins, ending at the next heading of any
/// level; without such a heading the whole body is the task.
fn extract_task(body: &str) -> String {
    let mut in_task = false;
    let mut found = false;
    let mut task_lines: Vec<&str> = Vec::new();

    for line in body.lines() {
        let trimmed = line.trim();

        if !found && TASK_HEADING_RE.is_match(trimmed) {
            in_task = true;
            found = true;
            continue;
        }

        if in_task {
            if trimmed.starts_with('#') {
                break;
            }
            task_lines.push(line);
        }
    }

    if found {
        task_lines.join("\n").trim().to_string()
    } else {
        body.trim().to_string()
    }
}
