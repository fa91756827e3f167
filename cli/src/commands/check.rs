//! # Cmdgate Check Command
//!
//! File: cli/src/commands/check.rs
//!
//! ## Overview
//!
//! `cmdgate check` loads and validates the configuration exactly as `serve`
//! would, then prints the endpoint table. Nothing is executed and no socket
//! is opened, so it is safe to run in CI or before a deploy.
//!
//! ## Examples
//!
//! ```bash
//! cmdgate --config gateway.toml check
//! ```
//!
use crate::common::ui;
use crate::core::config::{self, ConfigOverrides};
use crate::core::error::Result;
use clap::Parser;
use std::path::Path;
use tracing::info;

/// # Check Command Arguments (`CheckArgs`)
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Default command timeout in seconds used for the TIMEOUT column.
    #[arg(long, value_name = "SECS")]
    pub default_timeout: Option<u64>,
}

/// # Handle Check Command (`handle_check`)
///
/// Validates the config at `config_path` and prints one line per endpoint
/// followed by a summary line.
///
/// ## Errors
///
/// Returns the first validation error found; `main` turns it into exit
/// status 1.
pub async fn handle_check(config_path: &Path, args: CheckArgs) -> Result<()> {
    info!("Handling check command with args: {:?}", args);

    let overrides = ConfigOverrides {
        addr: None,
        default_timeout: args.default_timeout,
    };
    let config = config::load_config(config_path, &overrides)?;

    for line in ui::endpoint_table(&config) {
        println!("{}", line);
    }
    println!(
        "\n✅ {} is valid: {} endpoint(s), listening address {}",
        config_path.display(),
        config.endpoints.len(),
        config.addr
    );
    Ok(())
}
