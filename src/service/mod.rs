//! Service layer: message fan-out.
//!
//! [`BroadcastRelay`] reads room membership from the
//! [`super::domain::RoomRegistry`] and hands payloads to each recipient's
//! outbound queue.

pub mod broadcast_relay;

pub use broadcast_relay::{BroadcastRelay, DeliveryReport};
