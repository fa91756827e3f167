//! # Cmdgate HTTP Server Implementation
//!
//! File: cli/src/commands/serve/server_logic.rs
//!
//! ## Overview
//!
//! This module implements the HTTP layer for `cmdgate serve`:
//! - One exact-match route per configured endpoint
//! - GET/POST only; any other method gets a 405 before anything runs
//! - Outcome to status mapping (200 / 500 / 504) with a JSON body
//! - Request tracing and graceful shutdown
//!
//! ## Architecture
//!
//! The handler owns a fresh `CancellationToken` per request and keeps a drop
//! guard for it. If the client disconnects, the handler future is dropped,
//! the token is cancelled, and the launcher's process-group guard kills the
//! running command.
//!
use crate::common::process::{self, ExecutionOutcome};
use crate::common::ui;
use crate::core::config::{EndpointSpec, ExecDefaults, GatewayConfig};
use crate::core::error::Result;
use anyhow::Context;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{error, info, warn, Level};

/// Methods the gateway accepts, as advertised in the `Allow` header.
const ALLOWED_METHODS: &str = "GET, POST";

/// # Run HTTP Server (`run_server`)
///
/// Binds `config.addr`, prints the endpoint table, and serves requests until
/// a shutdown signal arrives.
///
/// ## Errors
///
/// Returns an `Err` if the listener cannot be bound or the server fails.
pub async fn run_server(config: GatewayConfig) -> Result<()> {
    let addr = config.addr;
    let app = create_app(&config);

    // Bind the TCP listener before printing anything.
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind TCP listener to address {}", addr))?;

    // Startup banner with the endpoint table
    println!("\n=================================================================");
    println!("🚪 cmdgate listening on {}", addr);
    println!(
        "⏱️  Default timeout:    {}",
        match config.defaults.timeout_seconds {
            0 => "none".to_string(),
            secs => format!("{}s", secs),
        }
    );
    println!("=================================================================");
    for line in ui::endpoint_table(&config) {
        println!("{}", line);
    }
    println!();

    info!(
        "Serving {} endpoint(s) on {}",
        config.endpoints.len(),
        addr
    );

    // Start the Axum server with graceful shutdown handling.
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    println!("\nServer shutdown complete.");
    Ok(())
}

/// # Create Axum Application (`create_app`)
///
/// Builds the router with one route per endpoint and request tracing.
/// Paths that are not configured fall through to Axum's 404.
pub fn create_app(config: &GatewayConfig) -> Router {
    // Request tracing (method, URI, status, latency) at INFO.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::default().include_headers(false))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // One exact route per endpoint; `any` lets the handler answer 405 itself.
    let defaults = config.defaults;
    let mut router = Router::new();
    for endpoint in &config.endpoints {
        let endpoint = Arc::clone(endpoint);
        let path = endpoint.path.clone();
        router = router.route(
            &path,
            any(move |method: Method| {
                let endpoint = Arc::clone(&endpoint);
                async move { handle_endpoint(method, endpoint, defaults).await }
            }),
        );
    }

    router.layer(ServiceBuilder::new().layer(trace_layer))
}

/// Runs one endpoint for one request.
async fn handle_endpoint(
    method: Method,
    endpoint: Arc<EndpointSpec>,
    defaults: ExecDefaults,
) -> Response {
    if method != Method::GET && method != Method::POST {
        warn!(path = %endpoint.path, %method, "Rejected request method");
        let mut response = write_json(
            StatusCode::METHOD_NOT_ALLOWED,
            &serde_json::json!({ "error": "method not allowed" }),
        );
        response
            .headers_mut()
            .insert(header::ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
        return response;
    }

    // Cancelled when this handler returns or is dropped (client disconnect).
    let request_lifetime = CancellationToken::new();
    let _disconnect_guard = request_lifetime.clone().drop_guard();

    let outcome = process::execute(&endpoint, &defaults, &request_lifetime).await;
    write_json(status_for(&outcome), &outcome)
}

/// Maps an outcome to its HTTP status: 504 for timeouts, 500 for any other
/// error, 200 otherwise (including non-zero exits).
pub fn status_for(outcome: &ExecutionOutcome) -> StatusCode {
    if outcome.timed_out {
        StatusCode::GATEWAY_TIMEOUT
    } else if !outcome.error.is_empty() {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    }
}

/// Serializes `payload` as two-space indented JSON with a trailing newline.
fn write_json<T: Serialize>(status: StatusCode, payload: &T) -> Response {
    match serde_json::to_string_pretty(payload) {
        Ok(mut body) => {
            body.push('\n');
            (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
        }
        Err(e) => {
            error!("Failed to encode response body: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// # Handle Shutdown Signal (`shutdown_signal`)
///
/// Resolves when Ctrl+C or (on Unix) SIGTERM is received, letting in-flight
/// commands finish before the server exits.
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown..."),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received SIGTERM, initiating graceful shutdown...");
            }
            Err(e) => {
                error!(
                    "Failed to install SIGTERM handler: {}. Shutdown on SIGTERM might not work.",
                    e
                );
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

// --- Unit Tests ---
