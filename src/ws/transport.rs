//! Message transport seam.
//!
//! Sessions talk to clients only through [`Transport`], a bidirectional
//! frame channel with `recv`, `send` and `close`. Production connections use
//! axum's [`WebSocket`]; tests drive sessions over in-memory channels.

use std::future::Future;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};

use crate::error::TransportError;

/// One transport-level message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// UTF-8 text payload.
    Text(String),
    /// Binary payload.
    Binary(Vec<u8>),
    /// Keep-alive ping.
    Ping(Vec<u8>),
    /// Keep-alive pong.
    Pong(Vec<u8>),
    /// Close handshake.
    Close,
}

/// Bidirectional frame channel owned by exactly one session.
pub trait Transport: Send {
    /// Waits for the next inbound frame. `None` means the stream ended.
    fn recv(&mut self) -> impl Future<Output = Option<Result<Frame, TransportError>>> + Send;

    /// Writes one frame.
    fn send(&mut self, frame: Frame) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Starts the close handshake. Errors are ignored.
    fn close(&mut self) -> impl Future<Output = ()> + Send;
}

impl From<Message> for Frame {
    fn from(msg: Message) -> Self {
        match msg {
            Message::Text(text) => Self::Text(text.as_str().to_owned()),
            Message::Binary(bytes) => Self::Binary(bytes.to_vec()),
            Message::Ping(bytes) => Self::Ping(bytes.to_vec()),
            Message::Pong(bytes) => Self::Pong(bytes.to_vec()),
            Message::Close(_) => Self::Close,
        }
    }
}

impl From<Frame> for Message {
    fn from(frame: Frame) -> Self {
        match frame {
            Frame::Text(text) => Self::Text(text.into()),
            Frame::Binary(bytes) => Self::Binary(bytes.into()),
            Frame::Ping(bytes) => Self::Ping(bytes.into()),
            Frame::Pong(bytes) => Self::Pong(bytes.into()),
            Frame::Close => Self::Close(None),
        }
    }
}

impl Transport for WebSocket {
    async fn recv(&mut self) -> Option<Result<Frame, TransportError>> {
        let msg = StreamExt::next(self).await?;
        Some(
            msg.map(Frame::from)
                .map_err(|e| TransportError::Backend(Box::new(e))),
        )
    }

    async fn send(&mut self, frame: Frame) -> Result<(), TransportError> {
        SinkExt::send(self, Message::from(frame))
            .await
            .map_err(|e| TransportError::Backend(Box::new(e)))
    }

    async fn close(&mut self) {
        if let Err(e) = SinkExt::send(self, Message::Close(None)).await {
            tracing::trace!(error = %e, "close frame not sent");
        }
    }
}
