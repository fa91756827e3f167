//! # Process Launcher (`common::process::launcher`)
//!
//! File: cli/src/common/process/launcher.rs
//!
//! ## Overview
//!
//! Builds the child process for an endpoint and starts it inside its own
//! process group, so that cancellation can take down the whole tree (a
//! `sh -c` wrapper and everything it forked) with one `killpg`.
//!
//! ## Architecture
//!
//! - `spawn_piped`: stdout/stderr piped, child leads a new process group.
//! - `spawn_on_terminal`: all three stdio streams on a PTY slave, child leads
//!   a new session with the slave as its controlling terminal.
//! - `ProcessGroupGuard`: kills the group on demand (`terminate`) or when
//!   dropped while still armed, which covers the execution future being
//!   dropped mid-flight (e.g. the HTTP client disconnected).
//!
//! The working directory is used as given. It was validated when the config
//! was loaded; if it disappeared since, the spawn fails and the request
//! reports a launch error.
//!
use super::scope::ExecutionScope;
use super::ExecError;
use crate::core::config::EndpointSpec;
use nix::errno::Errno;
use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use std::io;
use std::os::fd::OwnedFd;
use std::process::Stdio;
use tokio::process::{Child, Command};
use tracing::{debug, warn};

/// Base command shared by both capture modes.
fn base_command(endpoint: &EndpointSpec) -> Command {
    let mut cmd = Command::new(endpoint.program());
    cmd.args(endpoint.args())
        .current_dir(&endpoint.work_dir)
        .stdin(Stdio::null())
        .kill_on_drop(true);
    cmd
}

/// Refuses to launch once the scope is already over.
fn ensure_live(scope: &ExecutionScope) -> Result<(), ExecError> {
    if scope.is_cancelled() {
        return Err(ExecError::Cancelled);
    }
    Ok(())
}

/// Spawns `cmd` and drops it right away so the parent's copies of any
/// stdio descriptors are closed.
fn spawn(mut cmd: Command, endpoint: &EndpointSpec) -> Result<Child, ExecError> {
    let child = cmd.spawn().map_err(|source| ExecError::Spawn {
        program: endpoint.program().to_string(),
        source,
    })?;
    debug!(
        path = %endpoint.path,
        pid = child.id(),
        work_dir = %endpoint.work_dir.display(),
        "Spawned command"
    );
    Ok(child)
}

/// Starts the endpoint with piped stdout/stderr in a new process group.
pub fn spawn_piped(endpoint: &EndpointSpec, scope: &ExecutionScope) -> Result<Child, ExecError> {
    ensure_live(scope)?;
    let mut cmd = base_command(endpoint);
    // Pipe both streams; pgid 0 makes the child its own group leader.
    cmd.stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .process_group(0);
    spawn(cmd, endpoint)
}

/// Starts the endpoint attached to the PTY slave `terminal`.
///
/// `terminal` is consumed; every copy the parent holds is closed before this
/// returns, so reads on the master see a hang-up once the child's side is gone.
pub fn spawn_on_terminal(
    endpoint: &EndpointSpec,
    scope: &ExecutionScope,
    terminal: OwnedFd,
) -> Result<Child, ExecError> {
    ensure_live(scope)?;
    // One descriptor per stdio stream; the original becomes stderr.
    let stdin = terminal.try_clone().map_err(ExecError::Terminal)?;
    let stdout = terminal.try_clone().map_err(ExecError::Terminal)?;

    let mut cmd = base_command(endpoint);
    cmd.stdin(Stdio::from(stdin))
        .stdout(Stdio::from(stdout))
        .stderr(Stdio::from(terminal));
    // SAFETY: the hook only calls async-signal-safe libc functions
    // (setsid, ioctl) between fork and exec.
    unsafe {
        cmd.pre_exec(attach_controlling_terminal);
    }
    spawn(cmd, endpoint)
}

/// Runs in the child between fork and exec: new session, then make fd 0
/// (the PTY slave) the controlling terminal.
fn attach_controlling_terminal() -> io::Result<()> {
    // SAFETY: plain syscalls on the child's own descriptors.
    unsafe {
        if libc::setsid() == -1 {
            return Err(io::Error::last_os_error());
        }
        if libc::ioctl(0, libc::TIOCSCTTY as _, 0) == -1 {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(())
}

/// Kills a child's process group on request or when dropped while armed.
#[derive(Debug)]
pub struct ProcessGroupGuard {
    pgid: Option<Pid>,
}

impl ProcessGroupGuard {
    /// Guards the group led by `child`. The child must have been started by
    /// this module, which makes its pid the group id.
    pub fn new(child: &Child) -> Self {
        let pgid = child
            .id()
            .and_then(|id| i32::try_from(id).ok())
            .map(Pid::from_raw);
        Self { pgid }
    }

    /// Sends SIGKILL to the whole group. A group that is already gone is fine.
    pub fn terminate(&self) {
        let Some(pgid) = self.pgid else {
            return;
        };
        match killpg(pgid, Signal::SIGKILL) {
            Ok(()) => debug!(pgid = pgid.as_raw(), "Killed process group"),
            Err(Errno::ESRCH) => {}
            Err(e) => warn!(pgid = pgid.as_raw(), "Failed to kill process group: {}", e),
        }
    }

    /// Disarms the guard once the child and its output are fully collected.
    pub fn release(&mut self) {
        self.pgid = None;
    }
}

impl Drop for ProcessGroupGuard {
    fn drop(&mut self) {
        self.terminate();
    }
}
