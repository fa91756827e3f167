//! # Cmdgate Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the startup-time infrastructure shared by every
//! command:
//! - `config`: Config file loading, CLI overrides, and endpoint validation
//! - `error`: Error types and the application `Result` alias
//!
//! ## Usage
//!
//! ```rust
//! use crate::core::config::{self, ConfigOverrides};
//! use crate::core::error::{GatewayError, Result};
//! ```
//!
pub mod config;
pub mod error;
