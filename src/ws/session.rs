//! Connection session: `Connecting → Joined → Closed`.
//!
//! A session owns its transport exclusively. Inbound frames and payloads
//! queued by other sessions' broadcasts are multiplexed in one loop, so the
//! transport is only ever written from the session's own task.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::Instrument;

use super::membership::RoomMembership;
use super::messages::{Envelope, EnvelopeKind, JoinDescriptor, SystemMessage};
use super::transport::{Frame, Transport};
use crate::config::SessionSettings;
use crate::domain::{ConnectionId, Outbound, Peer, RoomId};
use crate::error::{EnvelopeError, SessionError, TransportError};
use crate::service::BroadcastRelay;

/// How a session ended.
#[derive(Debug)]
pub enum SessionOutcome {
    /// The connection never joined a room.
    Rejected(SessionError),
    /// The connection joined `room_id` and has left it.
    Left {
        /// Room the connection was bound to.
        room_id: RoomId,
        /// Error that ended the session, `None` on a clean close.
        cause: Option<SessionError>,
    },
}

/// Shared dependencies handed to every session.
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Relay (and through it the registry) shared by all sessions.
    pub relay: BroadcastRelay,
    /// Timeouts and limits.
    pub settings: SessionSettings,
}

impl SessionContext {
    /// Creates a context.
    #[must_use]
    pub fn new(relay: BroadcastRelay, settings: SessionSettings) -> Self {
        Self { relay, settings }
    }
}

/// Drives one connection from accept to close.
///
/// Waits for the join descriptor, registers the connection, relays
/// payloads until the client goes away, then leaves the room. A connection
/// that fails to join is closed without touching the registry.
pub async fn run_session<T: Transport>(transport: T, ctx: SessionContext) -> SessionOutcome {
    let connection_id = ConnectionId::new();
    let span = tracing::info_span!("session", %connection_id);
    drive(transport, ctx, connection_id).instrument(span).await
}

async fn drive<T: Transport>(
    mut transport: T,
    ctx: SessionContext,
    connection_id: ConnectionId,
) -> SessionOutcome {
    let settings = ctx.settings;

    let join = match await_join(&mut transport, settings.join_timeout).await {
        Ok(join) => join,
        Err(err) => {
            if err.is_protocol_violation() {
                tracing::warn!(error = %err, "join rejected");
            } else {
                tracing::debug!(error = %err, "connection ended before join");
            }
            close(&mut transport, settings.send_timeout).await;
            return SessionOutcome::Rejected(err);
        }
    };

    let (tx, mut outbound) = mpsc::channel(settings.outbound_queue_capacity);
    let peer = Peer::new(connection_id, join.user_name.clone(), tx);
    let (membership, receipt) = RoomMembership::join(
        Arc::clone(ctx.relay.registry()),
        join.room_id.clone(),
        peer,
    )
    .await;
    tracing::info!(
        room_id = %join.room_id,
        user_name = %join.user_name,
        members = receipt.member_count,
        room_created = receipt.room_created,
        "joined room"
    );

    let result = relay_loop(&mut transport, &ctx, &join, connection_id, &mut outbound).await;
    let cause = match result {
        Ok(()) => None,
        Err(err) => {
            tracing::info!(error = %err, "session ended with error");
            Some(err)
        }
    };

    let room_id = membership.room_id().clone();
    let left = membership.release().await;
    tracing::info!(%room_id, user_name = %join.user_name, outcome = ?left, "left room");

    close(&mut transport, settings.send_timeout).await;
    SessionOutcome::Left { room_id, cause }
}

/// Waits for the first data frame and parses it as a join descriptor.
async fn await_join<T: Transport>(
    transport: &mut T,
    join_timeout: Duration,
) -> Result<JoinDescriptor, SessionError> {
    let text = tokio::time::timeout(join_timeout, next_data_frame(transport))
        .await
        .map_err(|_| SessionError::JoinTimeout(join_timeout))??;
    JoinDescriptor::parse(&text)
}

async fn next_data_frame<T: Transport>(transport: &mut T) -> Result<String, SessionError> {
    loop {
        match transport.recv().await {
            Some(Ok(Frame::Text(text))) => return Ok(text),
            Some(Ok(Frame::Binary(_))) => return Err(SessionError::UnexpectedFrame("binary")),
            Some(Ok(Frame::Ping(_) | Frame::Pong(_))) => {}
            Some(Ok(Frame::Close)) | None => return Err(SessionError::Disconnected),
            Some(Err(err)) => return Err(err.into()),
        }
    }
}

enum Event {
    Inbound(Option<Result<Frame, TransportError>>),
    Outbound(Option<Outbound>),
}

async fn relay_loop<T: Transport>(
    transport: &mut T,
    ctx: &SessionContext,
    join: &JoinDescriptor,
    connection_id: ConnectionId,
    outbound: &mut mpsc::Receiver<Outbound>,
) -> Result<(), SessionError> {
    let send_timeout = ctx.settings.send_timeout;

    if ctx.settings.join_ack {
        match serde_json::to_string(&SystemMessage::joined(join)) {
            Ok(ack) => send_frame(transport, Frame::Text(ack), send_timeout).await?,
            Err(err) => tracing::warn!(error = %err, "acknowledgement not serializable"),
        }
    }

    loop {
        let event = tokio::select! {
            frame = transport.recv() => Event::Inbound(frame),
            payload = outbound.recv() => Event::Outbound(payload),
        };

        match event {
            Event::Inbound(Some(Ok(Frame::Text(text)))) => {
                relay_text(&ctx.relay, join, connection_id, text).await;
            }
            Event::Inbound(Some(Ok(Frame::Binary(bytes)))) => {
                let err = EnvelopeError::Binary(bytes.len());
                tracing::warn!(error = %err, "payload dropped");
            }
            Event::Inbound(Some(Ok(Frame::Ping(_) | Frame::Pong(_)))) => {}
            Event::Inbound(Some(Ok(Frame::Close)) | None) => return Ok(()),
            Event::Inbound(Some(Err(err))) => return Err(err.into()),
            Event::Outbound(Some(payload)) => {
                send_frame(transport, Frame::Text(String::from(&*payload)), send_timeout).await?;
            }
            Event::Outbound(None) => return Err(SessionError::OutboundClosed),
        }
    }
}

async fn relay_text(
    relay: &BroadcastRelay,
    join: &JoinDescriptor,
    connection_id: ConnectionId,
    text: String,
) {
    let envelope = match Envelope::parse(&text) {
        Ok(envelope) => envelope,
        Err(err) => {
            tracing::warn!(error = %err, payload_len = text.len(), "payload dropped");
            return;
        }
    };

    let kind = envelope.kind();
    tracing::debug!(message_type = kind.as_str(), room_id = %join.room_id, "received");
    match kind {
        EnvelopeKind::Draw => tracing::debug!(
            color = %envelope.field_display("color"),
            is_eraser = %envelope.field_display("is_eraser"),
            stroke_width = %envelope.field_display("stroke_width"),
            "draw"
        ),
        EnvelopeKind::Clear => tracing::info!(
            user_name = %join.user_name,
            room_id = %join.room_id,
            "canvas cleared"
        ),
        EnvelopeKind::System | EnvelopeKind::Unknown => {}
    }

    relay
        .broadcast(&join.room_id, Outbound::from(text), connection_id)
        .await;
}

async fn send_frame<T: Transport>(
    transport: &mut T,
    frame: Frame,
    send_timeout: Duration,
) -> Result<(), SessionError> {
    tokio::time::timeout(send_timeout, transport.send(frame))
        .await
        .map_err(|_| SessionError::SendTimeout(send_timeout))?
        .map_err(SessionError::from)
}

async fn close<T: Transport>(transport: &mut T, send_timeout: Duration) {
    if tokio::time::timeout(send_timeout, transport.close())
        .await
        .is_err()
    {
        tracing::debug!("close handshake timed out");
    }
}
