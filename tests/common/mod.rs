//! Shared fixtures: an in-process relay on an ephemeral port and
//! WebSocket client helpers.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use canvas_relay::app_state::AppState;
use canvas_relay::config::SessionSettings;
use canvas_relay::domain::RoomRegistry;
use canvas_relay::server::build_app;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

/// Client side of a relay connection.
pub type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A relay server running on a background task.
#[derive(Debug)]
pub struct TestServer {
    /// Bound address.
    pub addr: SocketAddr,
    /// The server's registry, for asserting on room state.
    pub registry: Arc<RoomRegistry>,
}

impl TestServer {
    /// Starts a server with default session settings.
    pub async fn start() -> Self {
        Self::start_with(SessionSettings::default()).await
    }

    /// Starts a server with the given session settings.
    pub async fn start_with(settings: SessionSettings) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        let state = AppState::new(settings);
        let registry = Arc::clone(&state.registry);
        let app = build_app(state, Duration::from_secs(5));
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server runs");
        });
        Self { addr, registry }
    }

    /// Base URL for HTTP requests.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Opens a WebSocket without joining.
    pub async fn connect(&self) -> Client {
        let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{}/ws", self.addr))
            .await
            .expect("websocket handshake");
        ws
    }

    /// Opens a WebSocket, joins `room_id` and consumes the acknowledgement.
    pub async fn join(&self, room_id: &str, user_name: &str) -> Client {
        let mut ws = self.connect().await;
        let descriptor = serde_json::json!({ "room_id": room_id, "user_name": user_name });
        ws.send(Message::text(descriptor.to_string()))
            .await
            .expect("send join");
        let ack = recv_text(&mut ws).await;
        assert!(ack.contains("joined room"), "unexpected ack: {ack}");
        ws
    }
}

/// Receives the next text message, failing after two seconds.
pub async fn recv_text(ws: &mut Client) -> String {
    loop {
        let next = tokio::time::timeout(Duration::from_secs(2), ws.next())
            .await
            .expect("message within timeout");
        match next {
            Some(Ok(Message::Text(text))) => return text.as_str().to_owned(),
            Some(Ok(Message::Ping(_) | Message::Pong(_))) => continue,
            other => panic!("expected text message, got {other:?}"),
        }
    }
}

/// Asserts that nothing but control frames arrives within `wait`.
pub async fn assert_silent(ws: &mut Client, wait: Duration) {
    if let Ok(Some(Ok(Message::Text(text)))) = tokio::time::timeout(wait, ws.next()).await {
        panic!("unexpected message: {text}");
    }
}

/// Polls `check` until it returns `true`, failing after one second.
pub async fn eventually<F, Fut>(mut check: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    for _ in 0..100 {
        if check().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached within 1s");
}
