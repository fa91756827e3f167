//! # Cmdgate Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module loads the gateway configuration file and validates it into an
//! immutable `GatewayConfig`: the listen address, the process-wide default
//! timeout, and the table of endpoints. Validation happens exactly once, at
//! startup; the execution engine trusts the result and never re-checks it.
//!
//! ## Architecture
//!
//! Loading follows these steps:
//! 1. Read the file and parse it as JSON (or TOML when the extension is `.toml`)
//!    into the raw `FileConfig` shape.
//! 2. Apply command-line overrides (`--addr`, `--default-timeout`).
//! 3. Validate every endpoint: path syntax and uniqueness, non-empty command,
//!    existing absolute work directory.
//! 4. Freeze each endpoint into an `Arc<EndpointSpec>`, deciding its
//!    `CaptureMode` here rather than per request.
//!
//! ## Examples
//!
//! Configuration file format:
//!
//! ```json
//! {
//!   "addr": ":8080",
//!   "default_timeout_seconds": 30,
//!   "endpoints": [
//!     { "path": "/deploy", "command": ["/bin/sh", "-c", "make deploy"],
//!       "work_dir": "~/repo", "timeout_seconds": 120, "pty": false }
//!   ]
//! }
//! ```
//!
//! Loading and using configuration:
//!
//! ```rust
//! let cfg = config::load_config(Path::new("config.json"), &ConfigOverrides::default())?;
//! for endpoint in &cfg.endpoints {
//!     println!("{} -> {:?}", endpoint.path, endpoint.command);
//! }
//! ```
//!
use crate::common::fs::io;
use crate::common::process::CaptureMode;
use crate::core::error::{GatewayError, Result};
use anyhow::Context;
use serde::Deserialize;
use std::collections::HashSet;
use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Address used when the config file does not set `addr`.
pub const DEFAULT_ADDR: &str = ":8080";

/// Raw configuration file shape, before validation.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    addr: Option<String>,
    #[serde(default)]
    default_timeout_seconds: Option<u64>,
    #[serde(default)]
    endpoints: Vec<FileEndpoint>,
}

/// Raw endpoint entry. Missing fields default to empty so validation can
/// report which endpoint is incomplete instead of a generic parse error.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileEndpoint {
    #[serde(default)]
    path: String,
    #[serde(default)]
    command: Vec<String>,
    #[serde(default)]
    work_dir: String,
    #[serde(default)]
    timeout_seconds: Option<u64>,
    #[serde(default)]
    pty: bool,
}

/// Values given on the command line that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub addr: Option<String>,
    pub default_timeout: Option<u64>,
}

/// Process-wide execution defaults handed to the engine explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecDefaults {
    /// Deadline in seconds for endpoints without an override; `0` means none.
    pub timeout_seconds: u64,
}

/// A validated endpoint. Immutable and shared read-only across requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointSpec {
    /// HTTP path, unique, always starting with `/`.
    pub path: String,
    /// Program followed by its arguments; never empty.
    pub command: Vec<String>,
    /// Absolute, existing directory the command runs in.
    pub work_dir: PathBuf,
    /// Per-endpoint timeout in seconds. `Some(0)` disables the deadline.
    pub timeout_override: Option<u64>,
    pub capture: CaptureMode,
}

impl EndpointSpec {
    pub fn program(&self) -> &str {
        &self.command[0]
    }

    pub fn args(&self) -> &[String] {
        &self.command[1..]
    }
}

/// The effective, validated gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub addr: SocketAddr,
    pub defaults: ExecDefaults,
    pub endpoints: Vec<Arc<EndpointSpec>>,
}

impl GatewayConfig {
    /// Looks up an endpoint by its exact path.
    pub fn endpoint(&self, path: &str) -> Option<&Arc<EndpointSpec>> {
        self.endpoints.iter().find(|ep| ep.path == path)
    }
}

/// # Load Configuration (`load_config`)
///
/// Reads, parses, and validates the config file at `path`, applying any
/// command-line `overrides`. Relative `work_dir` values are resolved against
/// the current working directory of the gateway process.
///
/// ## Arguments
///
/// * `path`: Location of the config file. A `.toml` extension selects TOML; anything else is parsed as JSON.
/// * `overrides`: Values from the command line that replace file settings.
///
/// ## Returns
///
/// * `Result<GatewayConfig>`: The validated configuration.
///
/// ## Errors
///
/// Returns an error if the file cannot be read or parsed, or if any endpoint
/// fails validation. Validation messages name the offending endpoint path.
pub fn load_config(path: &Path, overrides: &ConfigOverrides) -> Result<GatewayConfig> {
    info!("Loading configuration from {}", path.display());
    let content = io::read_file_to_string(path)?;
    let mut file_config = parse_config(path, &content)?;

    if let Some(addr) = &overrides.addr {
        debug!("Overriding addr from command line: {}", addr);
        file_config.addr = Some(addr.clone());
    }
    if let Some(timeout) = overrides.default_timeout {
        debug!("Overriding default timeout from command line: {}s", timeout);
        file_config.default_timeout_seconds = Some(timeout);
    }

    let base_dir = env::current_dir().context("Failed to get current working directory")?;
    let config = validate(file_config, &base_dir)?;
    info!(
        "Loaded {} endpoint(s); default timeout {}s",
        config.endpoints.len(),
        config.defaults.timeout_seconds
    );
    Ok(config)
}

fn parse_config(path: &Path, content: &str) -> Result<FileConfig> {
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    if is_toml {
        toml::from_str(content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))
    } else {
        serde_json::from_str(content)
            .with_context(|| format!("Failed to parse JSON config file: {}", path.display()))
    }
}

fn validate(file_config: FileConfig, base_dir: &Path) -> Result<GatewayConfig> {
    if file_config.endpoints.is_empty() {
        anyhow::bail!(GatewayError::Config(
            "config must include at least one endpoint".into()
        ));
    }

    let addr = parse_addr(file_config.addr.as_deref().unwrap_or(DEFAULT_ADDR))?;
    let defaults = ExecDefaults {
        timeout_seconds: file_config.default_timeout_seconds.unwrap_or(0),
    };

    let mut seen = HashSet::with_capacity(file_config.endpoints.len());
    let mut endpoints = Vec::with_capacity(file_config.endpoints.len());
    for raw in file_config.endpoints {
        let endpoint = validate_endpoint(raw, base_dir)?;
        if !seen.insert(endpoint.path.clone()) {
            anyhow::bail!(GatewayError::Config(format!(
                "duplicate endpoint path: {:?}",
                endpoint.path
            )));
        }
        endpoints.push(Arc::new(endpoint));
    }

    Ok(GatewayConfig {
        addr,
        defaults,
        endpoints,
    })
}

fn validate_endpoint(raw: FileEndpoint, base_dir: &Path) -> Result<EndpointSpec> {
    if !raw.path.starts_with('/') {
        anyhow::bail!(GatewayError::Config(format!(
            "endpoint path must start with '/': {:?}",
            raw.path
        )));
    }
    // The router treats `{..}` and leading `:`/`*` segments as captures.
    let has_pattern_syntax = raw.path.contains(['{', '}'])
        || raw
            .path
            .split('/')
            .any(|segment| segment.starts_with(':') || segment.starts_with('*'));
    if has_pattern_syntax {
        anyhow::bail!(GatewayError::Config(format!(
            "endpoint path {:?} must be a literal path",
            raw.path
        )));
    }
    if raw.command.is_empty() || raw.command[0].is_empty() {
        anyhow::bail!(GatewayError::Config(format!(
            "endpoint {:?} must include a command",
            raw.path
        )));
    }
    if raw.work_dir.is_empty() {
        anyhow::bail!(GatewayError::Config(format!(
            "endpoint {:?} must include a work_dir",
            raw.path
        )));
    }
    let work_dir = io::resolve_work_dir(&raw.work_dir, base_dir)
        .with_context(|| format!("endpoint {:?} work_dir error", raw.path))?;

    let capture = if raw.pty {
        CaptureMode::Pty
    } else {
        CaptureMode::Pipe
    };

    Ok(EndpointSpec {
        path: raw.path,
        command: raw.command,
        work_dir,
        timeout_override: raw.timeout_seconds,
        capture,
    })
}

/// # Parse Listen Address (`parse_addr`)
///
/// Accepts either a full socket address (`127.0.0.1:9000`, `[::1]:9000`) or
/// the port-only form `:9000`, which binds all IPv4 interfaces.
pub fn parse_addr(raw: &str) -> Result<SocketAddr> {
    if let Some(port) = raw.strip_prefix(':') {
        let port: u16 = port.parse().map_err(|_| {
            GatewayError::Config(format!("invalid port in listen address {:?}", raw))
        })?;
        return Ok(SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port));
    }
    raw.parse()
        .map_err(|_| GatewayError::Config(format!("invalid listen address {:?}", raw)).into())
}
