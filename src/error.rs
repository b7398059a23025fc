//! Relay error types.
//!
//! [`RelayError`] is the HTTP-facing error of the introspection API; each
//! variant maps to a status code and a structured JSON error body. The
//! remaining enums describe the failure modes of the WebSocket side, each
//! scoped to a single connection or a single send:
//!
//! | Type               | Scope                   | Terminal for the session |
//! |--------------------|-------------------------|--------------------------|
//! | [`SessionError`]   | one connection          | yes                      |
//! | [`EnvelopeError`]  | one inbound payload     | no (logged and dropped)  |
//! | [`DeliveryError`]  | one recipient of a fan-out | no (counted)          |
//! | [`TransportError`] | one transport operation | yes                      |

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// ```json
/// { "error": { "code": 2001, "message": "room not found: room1" } }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Error returned by the REST introspection endpoints.
///
/// # Error Code Ranges
///
/// | Range     | Category  | HTTP Status               |
/// |-----------|-----------|---------------------------|
/// | 1000–1999 | Validation| 400 Bad Request           |
/// | 2000–2999 | Not Found | 404 Not Found             |
/// | 3000–3999 | Server    | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// No room with the given identifier is currently active.
    #[error("room not found: {0}")]
    RoomNotFound(String),

    /// The room identifier failed validation.
    #[error("invalid room id: {0}")]
    InvalidRoomId(#[from] ValidationError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RelayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRoomId(_) => 1001,
            Self::RoomNotFound(_) => 2001,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRoomId(_) => StatusCode::BAD_REQUEST,
            Self::RoomNotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

/// Value-object validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Room identifiers must contain at least one character.
    #[error("room id cannot be empty")]
    EmptyRoomId,
}

/// Terminal failure of a single connection session.
///
/// The first group of variants can only occur while waiting for the join
/// descriptor; a session that fails with one of them never touched the
/// registry.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The join descriptor was not valid JSON.
    #[error("malformed join descriptor: {0}")]
    MalformedJoin(#[source] serde_json::Error),

    /// The join descriptor was JSON but not an object.
    #[error("join descriptor is not a JSON object")]
    JoinNotAnObject,

    /// The join descriptor had no usable `room_id`.
    #[error("join descriptor is missing room_id")]
    MissingRoomId,

    /// The first data frame was not a text frame.
    #[error("expected a text join descriptor, got a {0} frame")]
    UnexpectedFrame(&'static str),

    /// No join descriptor arrived in time.
    #[error("no join descriptor within {0:?}")]
    JoinTimeout(Duration),

    /// The peer closed the connection before joining.
    #[error("connection closed before join")]
    Disconnected,

    /// The transport failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Writing a frame to the transport took longer than allowed.
    #[error("send did not complete within {0:?}")]
    SendTimeout(Duration),

    /// Every sender of the outbound queue was dropped.
    #[error("outbound queue closed")]
    OutboundClosed,
}

impl SessionError {
    /// Returns `true` for errors caused by a protocol violation of the
    /// client (as opposed to I/O failures or timeouts).
    #[must_use]
    pub const fn is_protocol_violation(&self) -> bool {
        matches!(
            self,
            Self::MalformedJoin(_)
                | Self::JoinNotAnObject
                | Self::MissingRoomId
                | Self::UnexpectedFrame(_)
        )
    }
}

/// Non-terminal failure to decode one inbound payload.
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    /// The payload is not valid JSON.
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload is JSON but not an object.
    #[error("payload is not a JSON object")]
    NotAnObject,

    /// Binary frames carry no envelope.
    #[error("binary frame of {0} bytes ignored")]
    Binary(usize),
}

/// Failure to hand a payload to one recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    /// The recipient's outbound queue is full.
    #[error("recipient queue is full")]
    QueueFull,

    /// The recipient's session has ended.
    #[error("recipient disconnected")]
    Disconnected,
}

/// Failure of the underlying message transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The transport was already closed.
    #[error("transport closed")]
    Closed,

    /// The transport backend reported an error.
    #[error("transport error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}
