//! # Cmdgate CLI Main Integration Tests
//!
//! File: cli/tests/main_tests.rs
//!
//! ## Overview
//!
//! Verifies the top-level behavior of the `cmdgate` binary: standard flags,
//! subcommand discovery, and the error exit path.
//!

mod common;
use common::*;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_help_flag_lists_commands() {
    cmdgate_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn test_version_flag() {
    cmdgate_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_subcommand_help() {
    cmdgate_cmd()
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--addr"))
        .stdout(predicate::str::contains("--default-timeout"));
}

#[test]
fn test_missing_subcommand_fails() {
    cmdgate_cmd().assert().failure();
}

#[test]
fn test_missing_config_file_exits_with_error() {
    let dir = tempdir().unwrap();
    cmdgate_cmd()
        .current_dir(dir.path())
        .arg("check")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Error: Failed to read file \"config.json\"",
        ));
}

#[test]
fn test_config_path_from_environment() {
    let dir = tempdir().unwrap();
    let config = write_config(
        dir.path(),
        "gateway.json",
        &shell_config(dir.path(), &[("/env", "true", None)]),
    );
    cmdgate_cmd()
        .env("CMDGATE_CONFIG", &config)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("/env"));
}
