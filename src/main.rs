//! canvas-relay server entry point.
//!
//! Starts the Axum HTTP server with the WebSocket relay and the REST
//! introspection endpoints.

use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use canvas_relay::app_state::AppState;
use canvas_relay::config::{LogFormat, RelayConfig};
use canvas_relay::server::{build_app, shutdown_signal};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = RelayConfig::from_env().context("invalid LISTEN_ADDR")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    tracing::info!(
        addr = %config.listen_addr,
        join_timeout_secs = config.join_timeout_secs,
        outbound_queue_capacity = config.outbound_queue_capacity,
        "starting canvas-relay"
    );

    // Build application state and router
    let state = AppState::new(config.session_settings());
    let app = build_app(state, Duration::from_secs(config.http_timeout_secs));

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}
