//! # Pipe Capture (`common::process::pipe`)
//!
//! File: cli/src/common/process/pipe.rs
//!
//! Runs the child with stdout and stderr on two separate pipes and keeps
//! them apart in the result. Output written before a cancellation is kept.
//!
use super::launcher::{self, ProcessGroupGuard};
use super::scope::ExecutionScope;
use super::{exit_error, lossy_text, Captured, ExecError};
use crate::core::config::EndpointSpec;
use tracing::debug;

/// Starts the endpoint and blocks until it exits or the scope is cancelled.
pub async fn capture(endpoint: &EndpointSpec, scope: &ExecutionScope) -> Captured {
    // Launch in a new process group.
    let child = match launcher::spawn_piped(endpoint, scope) {
        Ok(child) => child,
        Err(err) => return Captured::failed(err),
    };
    let mut group = ProcessGroupGuard::new(&child);

    // Reads both pipes to the end while waiting for the exit status.
    let output = child.wait_with_output();
    tokio::pin!(output);
    let result = tokio::select! {
        result = &mut output => result,
        _ = scope.cancelled() => {
            debug!(path = %endpoint.path, "Scope cancelled, terminating command");
            group.terminate();
            output.await
        }
    };
    group.release();

    // Decode what was collected, even after a kill.
    match result {
        Ok(output) => Captured {
            stdout: lossy_text(output.stdout),
            stderr: lossy_text(output.stderr),
            error: exit_error(output.status),
        },
        Err(err) => Captured::failed(ExecError::Wait(err)),
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::process::tests::shell_endpoint;
    use crate::common::process::CaptureMode;
    use std::time::{Duration, Instant};
    use tempfile::tempdir;
    use tokio_util::sync::CancellationToken;

    fn scope(timeout: Option<Duration>) -> ExecutionScope {
        ExecutionScope::new(&CancellationToken::new(), timeout)
    }

    #[tokio::test]
    async fn test_streams_stay_separate() {
        let dir = tempdir().unwrap();
        let ep = shell_endpoint("echo out; echo err >&2", None, CaptureMode::Pipe, dir.path());
        let captured = capture(&ep, &scope(None)).await;
        assert_eq!(captured.stdout, "out\n");
        assert_eq!(captured.stderr, "err\n");
        assert!(captured.error.is_none());
    }

    #[tokio::test]
    async fn test_non_zero_exit_keeps_output() {
        let dir = tempdir().unwrap();
        let ep = shell_endpoint("echo partial; exit 3", None, CaptureMode::Pipe, dir.path());
        let captured = capture(&ep, &scope(None)).await;
        assert_eq!(captured.stdout, "partial\n");
        assert!(matches!(captured.error, Some(ExecError::Exited { code: 3 })));
    }

    #[tokio::test]
    async fn test_not_a_terminal() {
        let dir = tempdir().unwrap();
        let ep = shell_endpoint(
            "if [ -t 1 ]; then echo tty; else echo notty; fi",
            None,
            CaptureMode::Pipe,
            dir.path(),
        );
        let captured = capture(&ep, &scope(None)).await;
        assert_eq!(captured.stdout.trim(), "notty");
    }

    #[tokio::test]
    async fn test_deadline_kills_whole_group() {
        let dir = tempdir().unwrap();
        // The background sleep holds the pipes open; only a group kill ends it.
        let ep = shell_endpoint(
            "echo started; sleep 30 & sleep 30; wait",
            None,
            CaptureMode::Pipe,
            dir.path(),
        );
        let scope = scope(Some(Duration::from_secs(1)));
        let started = Instant::now();
        let captured = capture(&ep, &scope).await;
        assert!(started.elapsed() < Duration::from_secs(10));
        assert!(scope.timed_out());
        assert_eq!(captured.stdout, "started\n");
        assert!(matches!(captured.error, Some(ExecError::Signaled { .. })));
    }

    #[tokio::test]
    async fn test_spawn_failure() {
        let dir = tempdir().unwrap();
        let mut ep = shell_endpoint("", None, CaptureMode::Pipe, dir.path());
        ep.command = vec!["/no/such/binary".into()];
        let captured = capture(&ep, &scope(None)).await;
        assert!(captured.stdout.is_empty());
        assert!(matches!(captured.error, Some(ExecError::Spawn { .. })));
    }
}
