//! Axum WebSocket upgrade handler.

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::IntoResponse;

use super::session::{SessionContext, SessionOutcome, run_session};
use crate::app_state::AppState;

/// `GET /ws` — Upgrade HTTP connection to WebSocket and run a relay session.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let ctx = SessionContext::new(state.relay.clone(), state.settings);

    ws.max_message_size(state.settings.max_message_bytes)
        .on_upgrade(move |socket| async move {
            match run_session(socket, ctx).await {
                SessionOutcome::Rejected(err) => {
                    tracing::debug!(error = %err, "ws connection rejected");
                }
                SessionOutcome::Left { room_id, cause } => {
                    tracing::debug!(%room_id, clean = cause.is_none(), "ws connection closed");
                }
            }
        })
}
