//! # Cmdgate UI Utilities Module (`common::ui`)
//!
//! File: cli/src/common/ui/mod.rs
//!
//! ## Overview
//!
//! Plain-text rendering of the endpoint table, shared by the `serve` startup
//! banner and the `check` command so both show the same view of a config.
//!
//! ## Usage
//!
//! ```rust
//! for line in ui::endpoint_table(&config) {
//!     println!("{}", line);
//! }
//! ```
//!
use crate::common::process::scope::resolve_timeout;
use crate::core::config::{EndpointSpec, GatewayConfig};

/// Human-readable effective timeout for an endpoint.
pub fn timeout_label(endpoint: &EndpointSpec, default_seconds: u64) -> String {
    match resolve_timeout(default_seconds, endpoint.timeout_override) {
        Some(limit) => format!("{}s", limit.as_secs()),
        None => "none".to_string(),
    }
}

/// Renders one aligned line per endpoint, preceded by a header line.
///
/// Columns: path, capture mode, effective timeout, work dir, command.
pub fn endpoint_table(config: &GatewayConfig) -> Vec<String> {
    let rows: Vec<[String; 5]> = config
        .endpoints
        .iter()
        .map(|ep| {
            [
                ep.path.clone(),
                ep.capture.as_str().to_string(),
                timeout_label(ep, config.defaults.timeout_seconds),
                ep.work_dir.display().to_string(),
                ep.command.join(" "),
            ]
        })
        .collect();

    let header = [
        "PATH".to_string(),
        "MODE".to_string(),
        "TIMEOUT".to_string(),
        "WORK DIR".to_string(),
        "COMMAND".to_string(),
    ];
    let mut widths = header.clone().map(|h| h.len());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    std::iter::once(&header)
        .chain(rows.iter())
        .map(|row| {
            // The last column is left unpadded.
            let mut line = String::new();
            for (i, cell) in row.iter().enumerate() {
                if i + 1 == row.len() {
                    line.push_str(cell);
                } else {
                    line.push_str(&format!("{:<width$}  ", cell, width = widths[i]));
                }
            }
            line
        })
        .collect()
}
