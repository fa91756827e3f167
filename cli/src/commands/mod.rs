//! # Cmdgate Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the top-level subcommands of the cmdgate CLI so the
//! application entry point (`main.rs`) can route to them.
//!
//! ## Commands
//!
//! - `serve`: Expose every configured endpoint over HTTP
//! - `check`: Validate a config file and print the endpoint table
//! - `run`: Execute one endpoint locally and print its JSON outcome
//!
//! Each command defines its own arguments structure and an async handler
//! that receives the resolved config file path.
//!

/// Validates a configuration file without serving it.
pub mod check;
/// Runs a single endpoint once, outside of HTTP.
pub mod run;
/// The HTTP gateway. Includes the router and server lifecycle.
pub mod serve;
