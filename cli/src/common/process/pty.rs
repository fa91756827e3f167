//! # Pseudo-Terminal Capture (`common::process::pty`)
//!
//! File: cli/src/common/process/pty.rs
//!
//! ## Overview
//!
//! Runs the child attached to a freshly allocated pseudo-terminal, for
//! programs that change buffering, colour, or prompting when their output is
//! not a terminal. The PTY merges stdout and stderr into one stream, so the
//! result always has an empty `stderr`.
//!
//! ## Failure handling
//!
//! - Allocation or launch failure returns immediately; nothing is awaited.
//!   Both PTY descriptors are `OwnedFd`s and close on every path.
//! - Reading the master ends with `EIO` on Linux once the last slave
//!   descriptor closes. That is the normal hang-up and is not an error.
//! - Any other read error replaces the wait result, but only when wait itself
//!   reported a clean exit (`merge_read_error`).
//!
use super::launcher::{self, ProcessGroupGuard};
use super::scope::ExecutionScope;
use super::{exit_error, lossy_text, Captured, ExecError};
use crate::core::config::EndpointSpec;
use nix::pty::{openpty, OpenptyResult, Winsize};
use std::fs::File;
use std::io::{self, Read};
use std::os::fd::{AsRawFd, OwnedFd};
use std::process::ExitStatus;
use tokio::task::JoinError;
use tracing::debug;

/// Terminal size reported to the child.
const WINDOW_SIZE: Winsize = Winsize {
    ws_row: 24,
    ws_col: 80,
    ws_xpixel: 0,
    ws_ypixel: 0,
};

/// Bytes read from the master and how the read loop ended.
type Drained = (Vec<u8>, io::Result<()>);

/// Starts the endpoint on a PTY and blocks until it exits and the terminal
/// has been drained, or the scope is cancelled.
pub async fn capture(endpoint: &EndpointSpec, scope: &ExecutionScope) -> Captured {
    // Allocate the terminal pair.
    let OpenptyResult { master, slave } = match openpty(Some(&WINDOW_SIZE), None) {
        Ok(pair) => pair,
        Err(errno) => return Captured::failed(ExecError::PtyAllocation(errno)),
    };
    // openpty(3) does not set close-on-exec; without it, commands spawned by
    // concurrent requests would inherit this terminal and keep it open.
    if let Err(err) = set_cloexec(&master).and_then(|()| set_cloexec(&slave)) {
        return Captured::failed(ExecError::Terminal(err));
    }

    // Launch on the slave; the launcher consumes it.
    let mut child = match launcher::spawn_on_terminal(endpoint, scope, slave) {
        Ok(child) => child,
        Err(err) => return Captured::failed(err),
    };
    let mut group = ProcessGroupGuard::new(&child);

    // Drain the master on a blocking thread while the child runs.
    let mut reader = tokio::task::spawn_blocking(move || drain_terminal(master));

    // Wait for the exit status, or kill the group once the scope ends.
    let wait = tokio::select! {
        status = child.wait() => wait_error(status),
        _ = scope.cancelled() => {
            debug!(path = %endpoint.path, "Scope cancelled, terminating command");
            group.terminate();
            wait_error(child.wait().await)
        }
    };

    // Background children may still hold the terminal open after the leader
    // exits; the deadline still applies to them.
    let (output, read_result) = tokio::select! {
        drained = &mut reader => joined(drained),
        _ = scope.cancelled() => {
            group.terminate();
            joined(reader.await)
        }
    };
    group.release();

    Captured {
        stdout: lossy_text(output),
        stderr: String::new(),
        error: merge_read_error(wait, read_result),
    }
}

/// Combines the wait result with how the terminal read ended. A read error
/// (hang-up already filtered out) is reported only when wait saw a clean exit.
fn merge_read_error(wait: Option<ExecError>, read: io::Result<()>) -> Option<ExecError> {
    match (wait, read) {
        (None, Err(read_err)) => {
            debug!("Promoting terminal read error: {}", read_err);
            Some(ExecError::Read(read_err))
        }
        (wait, _) => wait,
    }
}

fn wait_error(status: io::Result<ExitStatus>) -> Option<ExecError> {
    match status {
        Ok(status) => exit_error(status),
        Err(err) => Some(ExecError::Wait(err)),
    }
}

fn joined(result: Result<Drained, JoinError>) -> Drained {
    result.unwrap_or_else(|join_err| (Vec::new(), Err(io::Error::other(join_err))))
}

fn set_cloexec(fd: &OwnedFd) -> io::Result<()> {
    // SAFETY: F_SETFD on a descriptor we own.
    if unsafe { libc::fcntl(fd.as_raw_fd(), libc::F_SETFD, libc::FD_CLOEXEC) } == -1 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Reads the master to end-of-stream on a blocking thread.
fn drain_terminal(master: OwnedFd) -> Drained {
    let mut terminal = File::from(master);
    let mut output = Vec::new();
    let result = match terminal.read_to_end(&mut output) {
        Ok(_) => Ok(()),
        Err(err) if is_hangup(&err) => Ok(()),
        Err(err) => Err(err),
    };
    (output, result)
}

/// `EIO` is how Linux reports that the slave side of the terminal closed.
pub(crate) fn is_hangup(err: &io::Error) -> bool {
    err.raw_os_error() == Some(libc::EIO)
}
