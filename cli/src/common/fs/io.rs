//! # Cmdgate Filesystem I/O Utilities (`common::fs::io`)
//!
//! File: cli/src/common/fs/io.rs
//!
//! ## Overview
//!
//! Provides the small set of filesystem operations the config loader needs:
//!
//! - **`read_file_to_string`**: Reads a whole file, attaching the path to any error.
//! - **`resolve_work_dir`**: Expands `~`, makes a path absolute against a base
//!   directory, and checks that it exists and is a directory.
//!
use crate::core::error::{GatewayError, Result};
use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads the entire content of a file into a string.
///
/// # Errors
///
/// Returns an `Err` if the file does not exist, cannot be read, or is not valid UTF-8.
pub fn read_file_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file {:?}", path))
}

/// # Resolve Work Directory (`resolve_work_dir`)
///
/// Turns a raw `work_dir` value from the config file into the absolute
/// directory a command will be launched in.
///
/// ## Steps:
/// 1. Expand a leading `~` with `shellexpand`. Anything else, `$` included,
///    is taken literally.
/// 2. Join relative paths onto `base` (the gateway's working directory).
/// 3. Check that the result exists and is a directory.
///
/// The returned path is absolute but not canonicalized: symlinks are kept as
/// written, the same way a shell `cd` would see them.
///
/// ## Errors
///
/// Returns a `GatewayError::FileSystem` if the path does not exist or is not
/// a directory.
pub fn resolve_work_dir(raw: &str, base: &Path) -> Result<PathBuf> {
    let candidate = PathBuf::from(shellexpand::tilde(raw).as_ref());
    let absolute = if candidate.is_absolute() {
        candidate
    } else {
        base.join(candidate)
    };

    let metadata = fs::metadata(&absolute).map_err(|e| {
        GatewayError::FileSystem(format!("{}: {}", absolute.display(), e))
    })?;
    if !metadata.is_dir() {
        anyhow::bail!(GatewayError::FileSystem(format!(
            "not a directory: {}",
            absolute.display()
        )));
    }

    debug!("Resolved work_dir {:?} to {}", raw, absolute.display());
    Ok(absolute)
}
