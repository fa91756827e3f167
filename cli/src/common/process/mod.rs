//! # Cmdgate Process Execution Engine (`common::process`)
//!
//! File: cli/src/common/process/mod.rs
//!
//! ## Overview
//!
//! This module turns an endpoint plus a request's cancellation token into a
//! bounded-lifetime child process and a normalized `ExecutionOutcome`. It is
//! the only place in cmdgate that spawns processes.
//!
//! ## Architecture
//!
//! One call to `execute` walks the same pipeline every time:
//!
//! ```text
//! scope (deadline) -> launcher (spawn) -> pipe | pty (capture) -> outcome (normalize)
//! ```
//!
//! - **`scope`**: Picks the effective timeout and owns the cancellation token
//!   and deadline timer for one execution.
//! - **`launcher`**: Builds the `tokio::process::Command` for an endpoint and
//!   guards the child's process group so it is killed on cancellation or drop.
//! - **`pipe`**: Captures stdout and stderr separately.
//! - **`pty`**: Runs the child on a pseudo-terminal and captures the merged stream.
//! - **`outcome`**: Maps the raw termination error and timeout flag to the
//!   final exit code and error message.
//!
//! Every failure kind ends up in the outcome; `execute` itself cannot fail.
//!
//! ## Usage
//!
//! ```rust
//! let cancel = CancellationToken::new();
//! let outcome = process::execute(&endpoint, &config.defaults, &cancel).await;
//! println!("{} exited with {}", outcome.path, outcome.exit_code);
//! ```
//!
use crate::core::config::{EndpointSpec, ExecDefaults};
use nix::sys::signal::Signal;
use std::io;
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Builds and guards child processes.
pub mod launcher;
/// Maps raw termination results to the canonical outcome record.
pub mod outcome;
/// Separate stdout/stderr capture.
pub mod pipe;
/// Merged-stream capture on a pseudo-terminal.
pub mod pty;
/// Timeout resolution and the per-execution cancellation scope.
pub mod scope;

pub use outcome::ExecutionOutcome;
use scope::ExecutionScope;

/// How an endpoint's output is captured. Decided once when the config is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    /// stdout and stderr collected independently.
    Pipe,
    /// Child attached to a pseudo-terminal; both streams arrive merged in stdout.
    Pty,
}

impl CaptureMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptureMode::Pipe => "pipe",
            CaptureMode::Pty => "pty",
        }
    }
}

/// Raw reason a command did not finish cleanly, before normalization.
#[derive(Error, Debug)]
pub enum ExecError {
    #[error("exit status {code}")]
    Exited { code: i32 },

    #[error("signal: {signal}")]
    Signaled { signal: String },

    #[error("failed to start {program:?}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to wait for command: {0}")]
    Wait(#[source] io::Error),

    #[error("failed to read terminal output: {0}")]
    Read(#[source] io::Error),

    #[error("failed to allocate pseudo-terminal: {0}")]
    PtyAllocation(#[source] nix::errno::Errno),

    #[error("failed to attach pseudo-terminal: {0}")]
    Terminal(#[source] io::Error),

    #[error("command cancelled before start")]
    Cancelled,
}

/// Text produced by a capture strategy plus the raw termination error, if any.
#[derive(Debug, Default)]
pub struct Captured {
    pub stdout: String,
    pub stderr: String,
    pub error: Option<ExecError>,
}

impl Captured {
    /// A capture that never got as far as producing output.
    pub fn failed(error: ExecError) -> Self {
        Self {
            error: Some(error),
            ..Default::default()
        }
    }
}

/// # Execute Endpoint (`execute`)
///
/// Runs `endpoint`'s command once and returns the normalized outcome.
///
/// ## Process:
/// 1. Resolve the effective timeout from the endpoint override and `defaults`.
/// 2. Open an `ExecutionScope` as a child of `parent`, arming the deadline timer.
/// 3. Launch and capture with the endpoint's `CaptureMode`.
/// 4. Close the scope, reading whether the deadline fired.
/// 5. Normalize into an `ExecutionOutcome`.
///
/// ## Arguments
///
/// * `endpoint`: The validated endpoint to run.
/// * `defaults`: Process-wide defaults (the default timeout).
/// * `parent`: The caller's cancellation token, e.g. the lifetime of an HTTP request.
///   Cancelling it kills the child but is not reported as a timeout.
///
/// ## Returns
///
/// * `ExecutionOutcome`: Always produced, whatever happened to the process.
pub async fn execute(
    endpoint: &EndpointSpec,
    defaults: &ExecDefaults,
    parent: &CancellationToken,
) -> ExecutionOutcome {
    let started = Instant::now();
    let timeout = scope::resolve_timeout(defaults.timeout_seconds, endpoint.timeout_override);
    let scope = ExecutionScope::new(parent, timeout);
    debug!(
        path = %endpoint.path,
        mode = endpoint.capture.as_str(),
        timeout_secs = scope.timeout().map(|t| t.as_secs()),
        "Dispatching command"
    );

    let captured = match endpoint.capture {
        CaptureMode::Pipe => pipe::capture(endpoint, &scope).await,
        CaptureMode::Pty => pty::capture(endpoint, &scope).await,
    };
    let timed_out = scope.finish();

    let outcome = outcome::normalize(&endpoint.path, captured, timed_out, started);
    info!(
        path = %outcome.path,
        exit_code = outcome.exit_code,
        timed_out = outcome.timed_out,
        duration = %outcome.duration,
        "Command finished"
    );
    outcome
}

/// Converts an exit status into the raw error the normalizer expects.
pub(crate) fn exit_error(status: ExitStatus) -> Option<ExecError> {
    if status.success() {
        return None;
    }
    if let Some(code) = status.code() {
        return Some(ExecError::Exited { code });
    }
    let signal = match status.signal() {
        Some(raw) => Signal::try_from(raw)
            .map(|sig| sig.as_str().to_string())
            .unwrap_or_else(|_| format!("signal {}", raw)),
        None => "unknown".to_string(),
    };
    Some(ExecError::Signaled { signal })
}

/// Decodes captured bytes, replacing invalid UTF-8 sequences.
pub(crate) fn lossy_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    }
}
