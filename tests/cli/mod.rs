use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

const ENV_KEYS: &[&str] = &[
    "PROBE_API_KEY",
    "PROBE_API_URL",
    "PROBE_TEST_DIR",
    "PROBE_MODEL",
    "PROBE_FAIL_ON_ERROR",
    "PROBE_TIMEOUT",
    "PROBE_SAVE_OUTPUTS",
    "PROBE_RESULTS_FILE",
    "PROBE_OUTPUT_DIR",
    "GITHUB_OUTPUT",
];

fn probe_cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("probe");
    for key in ENV_KEYS {
        cmd.env_remove(key);
    }
    cmd
}

#[test]
fn version_prints_crate_version() {
    probe_cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn run_without_api_key_exits_two() {
    let dir = tempdir().expect("tempdir");

    probe_cmd()
        .current_dir(dir.path())
        .arg("run")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("PROBE_API_KEY"));
}

#[test]
fn run_with_missing_test_directory_exits_two() {
    let dir = tempdir().expect("tempdir");

    probe_cmd()
        .current_dir(dir.path())
        .env("PROBE_API_KEY", "test-key")
        .arg("run")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn run_with_zero_tests_succeeds_and_writes_report() {
    let dir = tempdir().expect("tempdir");
    fs::create_dir_all(dir.path().join("tests")).expect("mkdir");

    probe_cmd()
        .current_dir(dir.path())
        .env("PROBE_API_KEY", "test-key")
        .args(["run", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("found 0 test file(s)"));

    let raw = fs::read_to_string(dir.path().join("test-results.json")).expect("report");
    let parsed: Value = serde_json::from_str(&raw).expect("report json");
    assert_eq!(parsed["summary"]["total"], 0);
    assert_eq!(parsed["summary"]["success_rate"], "0%");
}

#[test]
fn run_rejects_zero_timeout() {
    let dir = tempdir().expect("tempdir");

    probe_cmd()
        .current_dir(dir.path())
        .env("PROBE_API_KEY", "test-key")
        .args(["run", "--timeout", "0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--timeout"));
}

#[test]
fn list_works_without_an_api_key() {
    let dir = tempdir().expect("tempdir");
    fs::create_dir_all(dir.path().join("cases")).expect("mkdir");
    fs::write(
        dir.path().join("cases/login.md"),
        "---\nname: login flow\n---\n# Task\nLog in",
    )
    .expect("write doc");
    fs::write(dir.path().join("cases/broken.md"), "   \n").expect("write doc");

    let out = probe_cmd()
        .current_dir(dir.path())
        .args(["list", "--json", "--dir", "cases"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let parsed: Value = serde_json::from_slice(&out).expect("list json");
    let items = parsed.as_array().expect("array");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["valid"], false);
    assert_eq!(items[1]["valid"], true);
    assert_eq!(items[1]["name"], "login flow");
}

#[test]
fn list_on_missing_directory_exits_two() {
    let dir = tempdir().expect("tempdir");

    probe_cmd()
        .current_dir(dir.path())
        .args(["list", "--dir", "nope"])
        .assert()
        .code(2);
}
