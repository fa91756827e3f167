//! # Cmdgate Run Command
//!
//! File: cli/src/commands/run.rs
//!
//! ## Overview
//!
//! `cmdgate run <PATH>` executes one configured endpoint in the foreground,
//! without HTTP, and prints the same JSON document the server would return.
//! It goes through the same execution engine, so deadlines, PTY capture,
//! and error normalization behave identically.
//!
//! The exit status follows the HTTP status mapping: `0` when the server
//! would answer 200 (including a non-zero child exit), `1` when it would
//! answer 500 or 504.
//!
//! ## Examples
//!
//! ```bash
//! cmdgate run /deploy
//! cmdgate --config gateway.json run /status --default-timeout 5
//! ```
//!
use crate::common::process;
use crate::core::config::{self, ConfigOverrides};
use crate::core::error::{GatewayError, Result};
use anyhow::Context;
use clap::Parser;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// # Run Command Arguments (`RunArgs`)
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Endpoint path to execute, e.g. `/deploy`.
    #[arg(required = true)]
    pub path: String,

    /// Default command timeout in seconds (`0` = no deadline).
    #[arg(long, value_name = "SECS")]
    pub default_timeout: Option<u64>,
}

/// # Handle Run Command (`handle_run`)
///
/// Executes the endpoint registered at `args.path` and prints its outcome.
/// Ctrl+C cancels the execution and kills the command's process group.
///
/// ## Errors
///
/// Returns an error if the config is invalid, the path is unknown, or the
/// outcome carries an error (launch failure, timeout, signal death).
pub async fn handle_run(config_path: &Path, args: RunArgs) -> Result<()> {
    info!("Handling run command with args: {:?}", args);

    let overrides = ConfigOverrides {
        addr: None,
        default_timeout: args.default_timeout,
    };
    let config = config::load_config(config_path, &overrides)?;
    let endpoint = config
        .endpoint(&args.path)
        .ok_or_else(|| GatewayError::EndpointNotFound {
            path: args.path.clone(),
        })?;

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Received Ctrl+C, cancelling command...");
            interrupt.cancel();
        }
    });

    let outcome = process::execute(endpoint, &config.defaults, &cancel).await;
    watcher.abort();

    let body = serde_json::to_string_pretty(&outcome).context("Failed to encode outcome")?;
    println!("{}", body);

    if outcome.is_failure() {
        return Err(GatewayError::EndpointFailed {
            path: outcome.path,
            reason: outcome.error,
        }
        .into());
    }
    Ok(())
}
