//! # Execution Scope (`common::process::scope`)
//!
//! File: cli/src/common/process/scope.rs
//!
//! Resolves the effective deadline for one execution and owns the
//! cancellation token that ends it. A scope is cancelled by whichever comes
//! first: the deadline timer, the parent token (client went away), or the
//! scope being finished/dropped after the process completed.
//!
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Picks the effective timeout.
///
/// An endpoint override always wins, including `Some(0)`, which turns a
/// bounded default into "no deadline". Without an override the default
/// applies. A value of `0` yields `None`.
pub fn resolve_timeout(default_seconds: u64, override_seconds: Option<u64>) -> Option<Duration> {
    let seconds = override_seconds.unwrap_or(default_seconds);
    (seconds > 0).then(|| Duration::from_secs(seconds))
}

/// Cancellable lifetime of a single command execution.
#[derive(Debug)]
pub struct ExecutionScope {
    token: CancellationToken,
    timeout: Option<Duration>,
    deadline_fired: Arc<AtomicBool>,
    timer: Option<JoinHandle<()>>,
}

impl ExecutionScope {
    /// Derives a scope from `parent`. With a timeout, a timer task is armed
    /// that marks the deadline as fired and cancels the scope.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(parent: &CancellationToken, timeout: Option<Duration>) -> Self {
        let token = parent.child_token();
        let deadline_fired = Arc::new(AtomicBool::new(false));

        let timer = timeout.map(|limit| {
            let token = token.clone();
            let fired = Arc::clone(&deadline_fired);
            tokio::spawn(async move {
                tokio::select! {
                    _ = tokio::time::sleep(limit) => {
                        debug!("Deadline of {:?} reached, cancelling execution scope", limit);
                        fired.store(true, Ordering::SeqCst);
                        token.cancel();
                    }
                    _ = token.cancelled() => {}
                }
            })
        });

        Self {
            token,
            timeout,
            deadline_fired,
            timer,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Resolves once the scope is cancelled for any reason.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Whether the deadline timer fired. This flag, not the child's exit
    /// status, decides whether an execution is reported as timed out.
    pub fn timed_out(&self) -> bool {
        self.deadline_fired.load(Ordering::SeqCst)
    }

    /// Ends the scope and returns the final timed-out flag.
    pub fn finish(mut self) -> bool {
        self.release();
        self.timed_out()
    }

    fn release(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.token.cancel();
    }
}

impl Drop for ExecutionScope {
    fn drop(&mut self) {
        self.release();
    }
}
