//! WebSocket message types: join descriptor, envelope, acknowledgement.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::DEFAULT_USER_NAME;
use crate::domain::RoomId;
use crate::error::{EnvelopeError, SessionError};

/// First message on every connection, naming the room to enter.
///
/// ```json
/// { "room_id": "room1", "user_name": "Alice" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinDescriptor {
    /// Room to join.
    pub room_id: RoomId,
    /// Advisory display name; [`DEFAULT_USER_NAME`] when absent.
    pub user_name: String,
}

impl JoinDescriptor {
    /// Parses a join descriptor from a text frame.
    ///
    /// A `room_id` that is absent, `null`, empty or not a string is a
    /// protocol violation. A `user_name` that is not a string is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::MalformedJoin`] if `text` is not JSON,
    /// [`SessionError::JoinNotAnObject`] if it is JSON but not an object and
    /// [`SessionError::MissingRoomId`] if it has no usable room identifier.
    pub fn parse(text: &str) -> Result<Self, SessionError> {
        let value: Value = serde_json::from_str(text).map_err(SessionError::MalformedJoin)?;
        let Value::Object(mut fields) = value else {
            return Err(SessionError::JoinNotAnObject);
        };

        let room_id = match fields.remove("room_id") {
            Some(Value::String(id)) => RoomId::new(id).map_err(|_| SessionError::MissingRoomId)?,
            _ => return Err(SessionError::MissingRoomId),
        };
        let user_name = match fields.remove("user_name") {
            Some(Value::String(name)) => name,
            _ => DEFAULT_USER_NAME.to_string(),
        };

        Ok(Self { room_id, user_name })
    }
}

/// Classification of an envelope by its `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeKind {
    /// A stroke segment.
    Draw,
    /// Canvas reset.
    Clear,
    /// Informational message.
    System,
    /// Any other or missing `type`.
    Unknown,
}

impl EnvelopeKind {
    /// Maps a `type` value to its kind.
    #[must_use]
    pub fn from_type(value: Option<&str>) -> Self {
        match value {
            Some("draw") => Self::Draw,
            Some("clear") => Self::Clear,
            Some("system") => Self::System,
            _ => Self::Unknown,
        }
    }

    /// Canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draw => "draw",
            Self::Clear => "clear",
            Self::System => "system",
            Self::Unknown => "unknown",
        }
    }
}

/// A decoded payload exchanged after joining.
///
/// Only the `type` discriminator is interpreted; every other field is
/// opaque and the relay forwards the original text, not this value.
#[derive(Debug, Clone)]
pub struct Envelope {
    kind: EnvelopeKind,
    fields: Map<String, Value>,
}

impl Envelope {
    /// Decodes an envelope from a text frame.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Json`] for invalid JSON and
    /// [`EnvelopeError::NotAnObject`] for JSON that is not an object.
    pub fn parse(text: &str) -> Result<Self, EnvelopeError> {
        let Value::Object(fields) = serde_json::from_str::<Value>(text)? else {
            return Err(EnvelopeError::NotAnObject);
        };
        let kind = EnvelopeKind::from_type(fields.get("type").and_then(Value::as_str));
        Ok(Self { kind, fields })
    }

    /// The envelope's kind.
    #[must_use]
    pub const fn kind(&self) -> EnvelopeKind {
        self.kind
    }

    /// Returns a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Renders a field for log output; missing fields render as `null`.
    #[must_use]
    pub fn field_display(&self, name: &str) -> String {
        self.field(name)
            .map_or_else(|| "null".to_string(), Value::to_string)
    }
}

/// Session-scoped notice sent to a single connection.
///
/// ```json
/// { "type": "system", "message": "Alice joined room room1" }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct SystemMessage {
    /// Always `"system"`.
    #[serde(rename = "type")]
    pub msg_type: EnvelopeKind,
    /// Human-readable text.
    pub message: String,
}

impl SystemMessage {
    /// Acknowledgement for a successful join.
    #[must_use]
    pub fn joined(join: &JoinDescriptor) -> Self {
        Self {
            msg_type: EnvelopeKind::System,
            message: format!("{} joined room {}", join.user_name, join.room_id),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn join_with_name() {
        let Ok(join) = JoinDescriptor::parse(r#"{"room_id":"room1","user_name":"Alice"}"#) else {
            panic!("valid join");
        };
        assert_eq!(join.room_id.as_str(), "room1");
        assert_eq!(join.user_name, "Alice");
    }

    #[test]
    fn join_defaults_user_name() {
        let Ok(join) = JoinDescriptor::parse(r#"{"room_id":"room1"}"#) else {
            panic!("valid join");
        };
        assert_eq!(join.user_name, DEFAULT_USER_NAME);

        let Ok(join) = JoinDescriptor::parse(r#"{"room_id":"room1","user_name":7}"#) else {
            panic!("valid join");
        };
        assert_eq!(join.user_name, DEFAULT_USER_NAME);
    }

    #[test]
    fn join_without_room_is_rejected() {
        for text in [
            r#"{"user_name":"X"}"#,
            r#"{"room_id":null}"#,
            r#"{"room_id":""}"#,
            r#"{"room_id":42}"#,
        ] {
            assert!(
                matches!(JoinDescriptor::parse(text), Err(SessionError::MissingRoomId)),
                "{text} should be rejected"
            );
        }
    }

    #[test]
    fn join_that_is_not_an_object_is_malformed() {
        assert!(matches!(
            JoinDescriptor::parse("not json"),
            Err(SessionError::MalformedJoin(_))
        ));
        for text in ["[1,2]", "\"room1\"", "null"] {
            assert!(matches!(
                JoinDescriptor::parse(text),
                Err(SessionError::JoinNotAnObject)
            ));
        }
    }

    #[test]
    fn envelope_kinds() {
        let cases = [
            (r##"{"type":"draw","color":"#000"}"##, EnvelopeKind::Draw),
            (r#"{"type":"clear"}"#, EnvelopeKind::Clear),
            (r#"{"type":"system","message":"hi"}"#, EnvelopeKind::System),
            (r#"{"type":"cursor"}"#, EnvelopeKind::Unknown),
            (r#"{"type":5}"#, EnvelopeKind::Unknown),
            (r#"{"room_id":"room1"}"#, EnvelopeKind::Unknown),
        ];
        for (text, expected) in cases {
            let Ok(envelope) = Envelope::parse(text) else {
                panic!("{text} should parse");
            };
            assert_eq!(envelope.kind(), expected, "{text}");
        }
    }

    #[test]
    fn envelope_rejects_non_objects() {
        assert!(matches!(
            Envelope::parse("garbage"),
            Err(EnvelopeError::Json(_))
        ));
        assert!(matches!(
            Envelope::parse("[]"),
            Err(EnvelopeError::NotAnObject)
        ));
    }

    #[test]
    fn draw_fields_render_for_logs() {
        let Ok(envelope) = Envelope::parse(
            r##"{"type":"draw","color":"#000","is_eraser":false,"stroke_width":3}"##,
        ) else {
            panic!("valid draw");
        };
        assert_eq!(envelope.field_display("color"), "\"#000\"");
        assert_eq!(envelope.field_display("is_eraser"), "false");
        assert_eq!(envelope.field_display("stroke_width"), "3");
        assert_eq!(envelope.field_display("missing"), "null");
    }

    #[test]
    fn system_ack_shape() {
        let Ok(join) = JoinDescriptor::parse(r#"{"room_id":"room1","user_name":"Bob"}"#) else {
            panic!("valid join");
        };
        let Ok(json) = serde_json::to_value(SystemMessage::joined(&join)) else {
            panic!("serializable");
        };
        assert_eq!(json["type"], "system");
        assert_eq!(json["message"], "Bob joined room room1");
    }
}
