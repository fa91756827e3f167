//! # Cmdgate HTTP Command Server
//!
//! File: cli/src/commands/serve/mod.rs
//!
//! ## Overview
//!
//! This module implements `cmdgate serve`: it loads the endpoint table and
//! exposes every endpoint as an HTTP path. Each GET or POST to a path runs
//! that endpoint's command once and answers with the JSON outcome.
//!
//! ## Architecture
//!
//! - `mod.rs`: Argument parsing and the `handle_serve` entry point
//! - `server_logic.rs`: Axum router, request handler, status mapping, shutdown
//!
//! ## Examples
//!
//! ```bash
//! # Serve the endpoints in ./config.json on the configured address
//! cmdgate serve
//!
//! # Override the listen address and the default timeout
//! cmdgate --config /etc/cmdgate.json serve --addr 127.0.0.1:9000 --default-timeout 60
//! ```
//!
//! Server startup flow:
//! 1. Load and validate configuration, applying command-line overrides
//! 2. Build one route per endpoint
//! 3. Print the endpoint table and bind the listener
//! 4. Serve until Ctrl+C or SIGTERM
//!
use crate::core::config::{self, ConfigOverrides};
use crate::core::error::Result;
use clap::Parser;
use std::path::Path;
use tracing::info;

/// Contains the Axum-based HTTP server implementation.
pub mod server_logic;

/// # Serve Command Arguments (`ServeArgs`)
///
/// Command-line settings that override the corresponding config file values.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Listen address, either `host:port` or `:port` for all interfaces.
    /// Overrides `addr` from the config file.
    #[arg(long)]
    pub addr: Option<String>,

    /// Default command timeout in seconds (`0` = no deadline).
    /// Overrides `default_timeout_seconds` from the config file.
    #[arg(long, value_name = "SECS")]
    pub default_timeout: Option<u64>,
}

/// # Handle Serve Command (`handle_serve`)
///
/// Loads the configuration at `config_path`, merges the command-line
/// overrides from `args`, and runs the HTTP server until shutdown.
///
/// ## Errors
///
/// Returns an error if the configuration is invalid or the listener cannot
/// be bound. Failures of individual commands never surface here.
pub async fn handle_serve(config_path: &Path, args: ServeArgs) -> Result<()> {
    info!("Handling serve command with args: {:?}", args);

    let overrides = ConfigOverrides {
        addr: args.addr,
        default_timeout: args.default_timeout,
    };
    let config = config::load_config(config_path, &overrides)?;

    server_logic::run_server(config).await
}
