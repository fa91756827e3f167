//! # Cmdgate Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared building blocks used by the command handlers. The `common` module
//! itself only declares its submodules:
//!
//! - **`fs`**: Reading config files and resolving endpoint working directories.
//! - **`process`**: The execution engine. Resolves the deadline, launches the
//!   command in its own process group, captures output through pipes or a
//!   pseudo-terminal, and normalizes the result into an `ExecutionOutcome`.
//! - **`ui`**: Plain-text rendering of the endpoint table.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::process;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run_example(endpoint: &EndpointSpec, defaults: &ExecDefaults) {
//! let outcome = process::execute(endpoint, defaults, &CancellationToken::new()).await;
//! println!("{} exited with {}", outcome.path, outcome.exit_code);
//! # }
//! ```
//!
pub mod fs;
pub mod process;
pub mod ui;
