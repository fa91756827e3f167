//! # Cmdgate Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the startup-time error types used by cmdgate: anything
//! that can go wrong before a request is served (loading the config file,
//! validating endpoints, looking up an endpoint by path).
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `GatewayError`: A custom error enum using `thiserror` for specific error types
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! Per-request failures (spawn errors, non-zero exits, timeouts) never use this
//! type. They are captured by the execution engine as `ExecError` values and
//! folded into an `ExecutionOutcome`, so a failing command can never abort the
//! server.
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error type
//! if endpoint.command.is_empty() {
//!     return Err(GatewayError::Config(format!("endpoint {:?} must include a command", path)))?;
//! }
//!
//! // Add context to errors using anyhow
//! let content = fs::read_to_string(&path)
//!     .with_context(|| format!("Failed to read config file: {}", path.display()))?;
//! ```
//!
use thiserror::Error;

/// Custom error type for configuration and startup failures.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Filesystem error: {0}")]
    FileSystem(String),

    #[error("No endpoint is configured for path '{path}'.")]
    EndpointNotFound { path: String },

    #[error("Command for endpoint '{path}' failed: {reason}")]
    EndpointFailed { path: String, reason: String },
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
