//! # Result Normalizer (`common::process::outcome`)
//!
//! File: cli/src/common/process/outcome.rs
//!
//! ## Overview
//!
//! Folds whatever happened to a command into one `ExecutionOutcome`. Exactly
//! one of four cases applies, checked in this order:
//!
//! 1. The deadline fired: exit code `-1`, error `"command timed out"`, whatever
//!    the raw error says.
//! 2. The process exited with status N: exit code N, no error.
//! 3. Any other raw error (launch failure, read failure, signal death,
//!    cancellation): exit code `-1`, error is its message.
//! 4. No error: exit code `0`.
//!
//! Output is trimmed of surrounding whitespace and the elapsed time is
//! rendered in the compact `1h2m3.5s` / `12.3ms` style.
//!
use super::{Captured, ExecError};
use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;

/// Exit code reported when there is no meaningful process exit code.
pub const NO_EXIT_CODE: i32 = -1;

/// Error message reported for every execution that hit its deadline.
pub const TIMED_OUT_MESSAGE: &str = "command timed out";

/// Normalized result of one execution; also the HTTP response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionOutcome {
    pub path: String,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub duration: String,
    pub timed_out: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub error: String,
    #[serde(skip)]
    pub elapsed: Duration,
}

impl ExecutionOutcome {
    /// True for outcomes that count as a failure of the gateway rather than
    /// of the command: timeouts and anything carrying an error message.
    pub fn is_failure(&self) -> bool {
        self.timed_out || !self.error.is_empty()
    }
}

/// Builds the outcome for `path` from the capture result.
pub fn normalize(
    path: &str,
    captured: Captured,
    timed_out: bool,
    started: Instant,
) -> ExecutionOutcome {
    let (exit_code, error) = classify(captured.error.as_ref(), timed_out);
    let elapsed = started.elapsed();
    ExecutionOutcome {
        path: path.to_string(),
        exit_code,
        stdout: captured.stdout.trim().to_string(),
        stderr: captured.stderr.trim().to_string(),
        duration: format_duration(elapsed),
        timed_out,
        error,
        elapsed,
    }
}

fn classify(error: Option<&ExecError>, timed_out: bool) -> (i32, String) {
    if timed_out {
        return (NO_EXIT_CODE, TIMED_OUT_MESSAGE.to_string());
    }
    match error {
        Some(ExecError::Exited { code }) => (*code, String::new()),
        Some(other) => (NO_EXIT_CODE, other.to_string()),
        None => (0, String::new()),
    }
}

/// Formats a duration as hours/minutes/seconds for values of a second or
/// more (`2m3.5s`), and in the largest fitting sub-second unit otherwise
/// (`12.3ms`, `850µs`, `40ns`). Trailing fractional zeros are dropped.
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < 1_000 {
        return format!("{}ns", nanos);
    }
    if nanos < 1_000_000 {
        return format!("{}µs", decimal(nanos, 3));
    }
    if nanos < 1_000_000_000 {
        return format!("{}ms", decimal(nanos, 6));
    }

    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs / 60) % 60;
    let seconds = u128::from(total_secs % 60) * 1_000_000_000 + u128::from(duration.subsec_nanos());

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{}h", hours));
    }
    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{}m", minutes));
    }
    out.push_str(&decimal(seconds, 9));
    out.push('s');
    out
}

/// Renders `value / 10^scale` without trailing fractional zeros.
fn decimal(value: u128, scale: u32) -> String {
    let divisor = 10u128.pow(scale);
    let whole = value / divisor;
    let fraction = value % divisor;
    if fraction == 0 {
        return whole.to_string();
    }
    let digits = format!("{:0width$}", fraction, width = scale as usize);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn captured(stdout: &str, stderr: &str, error: Option<ExecError>) -> Captured {
        Captured {
            stdout: stdout.into(),
            stderr: stderr.into(),
            error,
        }
    }

    #[test]
    fn test_success() {
        let outcome = normalize("/ok", captured("  ok\n", "", None), false, Instant::now());
        assert_eq!(outcome.exit_code, 0);
        assert_eq!(outcome.stdout, "ok");
        assert!(outcome.error.is_empty());
        assert!(!outcome.timed_out);
        assert!(!outcome.is_failure());
    }

    #[test]
    fn test_non_zero_exit_is_not_an_error() {
        let outcome = normalize(
            "/fail",
            captured("", "boom\n", Some(ExecError::Exited { code: 7 })),
            false,
            Instant::now(),
        );
        assert_eq!(outcome.exit_code, 7);
        assert_eq!(outcome.stderr, "boom");
        assert!(outcome.error.is_empty());
        assert!(!outcome.is_failure());
    }

    #[test]
    fn test_timeout_takes_precedence() {
        for error in [
            Some(ExecError::Exited { code: 2 }),
            Some(ExecError::Signaled {
                signal: "SIGKILL".into(),
            }),
            None,
        ] {
            let outcome = normalize("/slow", captured("partial", "", error), true, Instant::now());
            assert_eq!(outcome.exit_code, NO_EXIT_CODE);
            assert_eq!(outcome.error, TIMED_OUT_MESSAGE);
            assert!(outcome.timed_out);
            assert!(outcome.is_failure());
            assert_eq!(outcome.stdout, "partial");
        }
    }

    #[test]
    fn test_other_errors_carry_their_message() {
        let spawn = ExecError::Spawn {
            program: "/no/such/binary".into(),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        let outcome = normalize("/missing", Captured::failed(spawn), false, Instant::now());
        assert_eq!(outcome.exit_code, NO_EXIT_CODE);
        assert!(outcome.error.starts_with("failed to start \"/no/such/binary\""));

        let signaled = normalize(
            "/killed",
            Captured::failed(ExecError::Signaled {
                signal: "SIGTERM".into(),
            }),
            false,
            Instant::now(),
        );
        assert_eq!(signaled.exit_code, NO_EXIT_CODE);
        assert_eq!(signaled.error, "signal: SIGTERM");
    }

    #[test]
    fn test_trimming_is_idempotent() {
        let first = normalize("/t", captured("\r\n  text \t\n", "", None), false, Instant::now());
        let second = normalize(
            "/t",
            captured(&first.stdout, &first.stderr, None),
            false,
            Instant::now(),
        );
        assert_eq!(first.stdout, "text");
        assert_eq!(first.stdout, second.stdout);
    }

    #[test]
    fn test_serialized_shape() {
        let mut outcome = normalize("/ok", captured("ok", "", None), false, Instant::now());
        outcome.duration = "1.5s".into();
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "path": "/ok",
                "exit_code": 0,
                "stdout": "ok",
                "stderr": "",
                "duration": "1.5s",
                "timed_out": false
            })
        );

        let failed = normalize("/slow", captured("", "", None), true, Instant::now());
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["error"], TIMED_OUT_MESSAGE);
        assert_eq!(json["exit_code"], -1);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::ZERO), "0s");
        assert_eq!(format_duration(Duration::from_nanos(40)), "40ns");
        assert_eq!(format_duration(Duration::from_micros(850)), "850µs");
        assert_eq!(format_duration(Duration::from_nanos(1_500)), "1.5µs");
        assert_eq!(format_duration(Duration::from_micros(12_300)), "12.3ms");
        assert_eq!(format_duration(Duration::from_millis(1_500)), "1.5s");
        assert_eq!(format_duration(Duration::from_secs(1)), "1s");
        assert_eq!(format_duration(Duration::from_millis(123_500)), "2m3.5s");
        assert_eq!(format_duration(Duration::from_secs(3600)), "1h0m0s");
        assert_eq!(
            format_duration(Duration::new(1, 2_345_678)),
            "1.002345678s"
        );
    }
}
