//! # Cmdgate Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!
//! ## Overview
//!
//! Filesystem helpers used while loading configuration: reading the config
//! file and turning an endpoint's `work_dir` into a validated absolute path.
//! Nothing here runs per request; working directories are checked once at
//! startup and trusted afterwards.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::fs::io;
//!
//! let content = io::read_file_to_string(Path::new("config.json"))?;
//! let work_dir = io::resolve_work_dir("~/repo", &std::env::current_dir()?)?;
//! ```
//!

/// Config file reading and work directory resolution.
pub mod io;
