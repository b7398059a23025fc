//! Domain layer: connection identity, rooms, and the room registry.
//!
//! This module contains the server-side model of who is connected and in
//! which room. The [`RoomRegistry`] is the only state shared between
//! connection sessions.

pub mod connection_id;
pub mod peer;
pub mod room;
pub mod room_id;
pub mod room_registry;

pub use connection_id::ConnectionId;
pub use peer::{Outbound, Peer};
pub use room::{MemberSummary, Room, RoomSummary};
pub use room_id::RoomId;
pub use room_registry::{JoinReceipt, LeaveOutcome, RoomRegistry};
