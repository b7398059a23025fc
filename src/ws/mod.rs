//! WebSocket layer: transport seam, message types, connection sessions.
//!
//! The endpoint at `/ws` accepts a connection, waits for its join
//! descriptor and then relays every payload it sends to the rest of its
//! room.

pub mod handler;
pub mod membership;
pub mod messages;
pub mod session;
pub mod transport;
