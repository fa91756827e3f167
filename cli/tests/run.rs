//! # Cmdgate CLI Run Integration Tests
//!
//! File: cli/tests/run.rs
//!
//! ## Overview
//!
//! Integration tests for `cmdgate run`, which executes one endpoint through
//! the full engine and prints the JSON outcome on stdout.
//!

mod common;
use common::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

fn fixture() -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let config = write_config(
        dir.path(),
        "config.json",
        &shell_config(
            dir.path(),
            &[
                ("/ok", "echo '  hello  '", None),
                ("/fail", "echo oops >&2; exit 7", None),
                ("/slow", "sleep 10", Some(1)),
                ("/where", "pwd -P", None),
            ],
        ),
    );
    (dir, config)
}

fn run_endpoint(config: &Path, path: &str) -> (Option<i32>, Value) {
    let output = cmdgate_cmd()
        .arg("--config")
        .arg(config)
        .args(["run", path])
        .output()
        .expect("Failed to execute cmdgate");
    let json = serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    (output.status.code(), json)
}

#[test]
fn test_run_success() {
    let (_dir, config) = fixture();
    let (code, json) = run_endpoint(&config, "/ok");
    assert_eq!(code, Some(0));
    assert_eq!(json["path"], "/ok");
    assert_eq!(json["exit_code"], 0);
    assert_eq!(json["stdout"], "hello");
    assert_eq!(json["timed_out"], false);
    assert!(json.get("error").is_none());
}

#[test]
fn test_run_non_zero_exit_is_reported_not_failed() {
    let (_dir, config) = fixture();
    let (code, json) = run_endpoint(&config, "/fail");
    assert_eq!(code, Some(0));
    assert_eq!(json["exit_code"], 7);
    assert_eq!(json["stderr"], "oops");
}

#[test]
fn test_run_timeout_exits_with_error() {
    let (_dir, config) = fixture();
    let (code, json) = run_endpoint(&config, "/slow");
    assert_eq!(code, Some(1));
    assert_eq!(json["exit_code"], -1);
    assert_eq!(json["timed_out"], true);
    assert_eq!(json["error"], "command timed out");
}

#[test]
fn test_run_uses_work_dir() {
    let (dir, config) = fixture();
    let (_, json) = run_endpoint(&config, "/where");
    let expected = dir.path().canonicalize().unwrap();
    assert_eq!(json["stdout"], expected.display().to_string());
}

#[test]
fn test_run_unknown_path() {
    let (_dir, config) = fixture();
    cmdgate_cmd()
        .arg("--config")
        .arg(&config)
        .args(["run", "/nope"])
        .assert()
        .code(1)
        .stderr(predicates::str::contains("No endpoint is configured for path '/nope'."));
}
