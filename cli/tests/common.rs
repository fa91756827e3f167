//! # Cmdgate CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration test crates in `cli/tests/`: locating
//! the compiled `cmdgate` binary and writing throwaway config files.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};

/// # Get Cmdgate Command (`cmdgate_cmd`)
///
/// Creates an `assert_cmd::Command` for the `cmdgate` binary built for this
/// test run, with `CMDGATE_CONFIG` and `RUST_LOG` cleared so the host
/// environment cannot leak into assertions.
///
/// ## Panics
/// Panics if the binary cannot be found via `Command::cargo_bin`.
pub fn cmdgate_cmd() -> Command {
    let mut cmd = Command::cargo_bin("cmdgate").expect("Failed to find cmdgate binary for testing");
    cmd.env_remove("CMDGATE_CONFIG").env_remove("RUST_LOG");
    cmd
}

/// Writes `contents` to `dir/name` and returns the file path.
pub fn write_config(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("Failed to write test config");
    path
}

/// Builds a JSON config whose endpoints all run `/bin/sh -c <script>` in
/// `work_dir`. Each entry is `(path, script, timeout_seconds)`.
pub fn shell_config(work_dir: &Path, endpoints: &[(&str, &str, Option<u64>)]) -> String {
    let endpoints: Vec<serde_json::Value> = endpoints
        .iter()
        .map(|(path, script, timeout)| {
            let mut endpoint = serde_json::json!({
                "path": path,
                "command": ["/bin/sh", "-c", script],
                "work_dir": work_dir,
            });
            if let Some(secs) = timeout {
                endpoint["timeout_seconds"] = serde_json::json!(secs);
            }
            endpoint
        })
        .collect();
    serde_json::json!({ "addr": "127.0.0.1:0", "endpoints": endpoints }).to_string()
}
