//! System endpoints: health check, session limits, browser test page.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
    active_rooms: usize,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, current timestamp and the number of active rooms.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            active_rooms: state.registry.len().await,
        }),
    )
}

/// Limits every WebSocket session runs with.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionLimits {
    join_timeout_ms: u64,
    send_timeout_ms: u64,
    outbound_queue_capacity: usize,
    max_message_bytes: usize,
    join_ack: bool,
}

/// `GET /config/session` — Session limits in effect.
#[utoipa::path(
    get,
    path = "/config/session",
    tag = "System",
    summary = "Session limits",
    description = "Returns the timeouts and queue limits applied to every WebSocket connection.",
    responses(
        (status = 200, description = "Session limits", body = SessionLimits),
    )
)]
pub async fn session_limits_handler(State(state): State<AppState>) -> impl IntoResponse {
    let settings = state.settings;
    Json(SessionLimits {
        join_timeout_ms: millis(settings.join_timeout),
        send_timeout_ms: millis(settings.send_timeout),
        outbound_queue_capacity: settings.outbound_queue_capacity,
        max_message_bytes: settings.max_message_bytes,
        join_ack: settings.join_ack,
    })
}

fn millis(duration: std::time::Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

const TEST_PAGE: &str = r#"<!doctype html>
<html>
  <body>
    <h1>canvas-relay</h1>
    <pre id="log"></pre>
    <script>
      const log = (line) => { document.getElementById("log").textContent += line + "\n"; };
      const socket = new WebSocket(`ws://${location.host}/ws`);
      socket.onopen = () => socket.send(JSON.stringify({ room_id: "room1", user_name: "Test User" }));
      socket.onmessage = (event) => log(event.data);
      socket.onclose = () => log("disconnected");
    </script>
  </body>
</html>
"#;

/// `GET /` — Minimal page that joins `room1` and prints what it receives.
pub async fn test_page_handler() -> Html<&'static str> {
    Html(TEST_PAGE)
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(test_page_handler))
        .route("/health", get(health_handler))
        .route("/config/session", get(session_limits_handler))
}
