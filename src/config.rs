use std::collections::HashMap;
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "https://api.browser-use.com/api/v1";
pub const DEFAULT_TEST_DIR: &str = "tests";
pub const DEFAULT_MODEL: &str = "browser-use-llm";
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_RESULTS_FILE: &str = "test-results.json";
pub const DEFAULT_OUTPUT_DIR: &str = "probe-outputs";

/// Process-wide configuration, loaded once at startup and passed down
/// explicitly. Nothing below the CLI boundary reads the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_url: String,
    pub test_dir: PathBuf,
    pub model: String,
    pub fail_on_error: bool,
    pub timeout_secs: u64,
    pub save_outputs: bool,
    pub results_file: PathBuf,
    pub output_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_vars(&vars)
    }

    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, String> {
        let api_key = vars
            .get("PROBE_API_KEY")
            .map(|v| v.trim().to_string())
            .unwrap_or_default();

        let timeout_secs = resolve_timeout(vars.get("PROBE_TIMEOUT").map(String::as_str))?;

        Ok(Self {
            api_key,
            api_url: resolve_text(vars.get("PROBE_API_URL"), DEFAULT_API_URL),
            test_dir: PathBuf::from(resolve_text(vars.get("PROBE_TEST_DIR"), DEFAULT_TEST_DIR)),
            model: resolve_text(vars.get("PROBE_MODEL"), DEFAULT_MODEL),
            fail_on_error: resolve_bool(vars.get("PROBE_FAIL_ON_ERROR"), true)?,
            timeout_secs,
            save_outputs: resolve_bool(vars.get("PROBE_SAVE_OUTPUTS"), true)?,
            results_file: PathBuf::from(resolve_text(
                vars.get("PROBE_RESULTS_FILE"),
                DEFAULT_RESULTS_FILE,
            )),
            output_dir: PathBuf::from(resolve_text(
                vars.get("PROBE_OUTPUT_DIR"),
                DEFAULT_OUTPUT_DIR,
            )),
        })
    }

    /// The credential is only checked where a run actually needs the
    /// remote service, so offline commands work without it.
    pub fn require_api_key(&self) -> Result<&str, String> {
        if self.api_key.is_empty() {
            return Err("PROBE_API_KEY environment variable is not set".to_string());
        }

        Ok(&self.api_key)
    }
}

fn resolve_text(value: Option<&String>, default_value: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => default_value.to_string(),
    }
}

fn resolve_bool(value: Option<&String>, default_value: bool) -> Result<bool, String> {
    let Some(raw) = value else {
        return Ok(default_value);
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(default_value);
    }

    match trimmed.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(format!("expected a boolean, got {other:?}")),
    }
}

fn resolve_timeout(value: Option<&str>) -> Result<u64, String> {
    let Some(raw) = value else {
        return Ok(DEFAULT_TIMEOUT_SECS);
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(DEFAULT_TIMEOUT_SECS);
    }

    let secs: u64 = trimmed
        .parse()
        .map_err(|_| format!("PROBE_TIMEOUT must be a whole number of seconds, got {trimmed:?}"))?;

    if secs == 0 {
        return Err("PROBE_TIMEOUT must be greater than zero".to_string());
    }

    Ok(secs)
}
