//! # Cmdgate Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file serves as the main entry point for the cmdgate CLI application.
//! It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the appropriate command handler
//!
//! ## Architecture
//!
//! - Each top-level command (`serve`, `check`, `run`) is a variant of the `Commands` enum
//! - The config file path is a global option shared by every command
//! - All errors are propagated to this level for consistent handling
//!
//! ## Examples
//!
//! ```bash
//! # Serve the endpoints in ./config.json
//! cmdgate serve
//!
//! # Validate another config file with debug logging
//! cmdgate -vv --config /etc/cmdgate/gateway.toml check
//!
//! # Execute one endpoint locally
//! CMDGATE_CONFIG=gateway.json cmdgate run /status
//! ```
//!
//! Command processing flow:
//! 1. Parse command-line args via Clap
//! 2. Configure logging based on verbosity level
//! 3. Route to the command handler
//! 4. Format and display any error that occurs, exiting with status 1
//!
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

// Declare the top-level modules of the CLI crate.
mod commands; // Subcommand handlers (serve, check, run)
mod common; // Execution engine and shared utilities
mod core; // Core infrastructure (errors, config)

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "cmdgate",
    about = "🚪 cmdgate: run pre-configured commands behind HTTP endpoints",
    long_about = "Maps HTTP paths to pre-configured commands. Each request runs its command\n\
                  once under a deadline and returns exit code, output and timing as JSON.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the gateway configuration file (JSON, or TOML by extension).
    #[arg(
        short,
        long,
        global = true,
        env = "CMDGATE_CONFIG",
        default_value = "config.json"
    )]
    config: PathBuf,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// Enum defining all available top-level commands.
#[derive(Parser, Debug)]
enum Commands {
    /// Serve the configured endpoints over HTTP.
    #[command(alias = "s")]
    Serve(commands::serve::ServeArgs),
    /// Validate the configuration and list its endpoints.
    Check(commands::check::CheckArgs),
    /// Execute one endpoint locally and print the JSON outcome.
    #[command(alias = "r")]
    Run(commands::run::RunArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Serve(args) => commands::serve::handle_serve(&cli.config, args).await,
        Commands::Check(args) => commands::check::handle_check(&cli.config, args).await,
        Commands::Run(args) => commands::run::handle_run(&cli.config, args).await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
