//! Broadcast relay: fans one payload out to the rest of a room.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::{ConnectionId, Outbound, RoomId, RoomRegistry};

/// Counters describing one fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeliveryReport {
    /// Recipients the relay tried to reach (members minus the sender).
    pub attempted: usize,
    /// Recipients whose queue accepted the payload.
    pub delivered: usize,
    /// Recipients whose queue was full or closed.
    pub failed: usize,
}

/// Delivers payloads to every member of a room except the sender.
///
/// Stateless coordinator over the shared [`RoomRegistry`]. Delivery never
/// waits on a recipient: payloads go into each peer's bounded outbound
/// queue, and a full or closed queue is counted as a failure. Failed
/// recipients are neither retried nor evicted; their own sessions notice
/// the dead transport and leave.
#[derive(Debug, Clone)]
pub struct BroadcastRelay {
    registry: Arc<RoomRegistry>,
}

impl BroadcastRelay {
    /// Creates a relay over `registry`.
    #[must_use]
    pub fn new(registry: Arc<RoomRegistry>) -> Self {
        Self { registry }
    }

    /// Returns a reference to the inner [`RoomRegistry`].
    #[must_use]
    pub fn registry(&self) -> &Arc<RoomRegistry> {
        &self.registry
    }

    /// Sends `payload` to every member of `room_id` other than `sender`.
    ///
    /// Membership is read once, as a single snapshot, before the first
    /// delivery; joins and leaves racing with the call affect the next
    /// broadcast, not this one.
    pub async fn broadcast(
        &self,
        room_id: &RoomId,
        payload: Outbound,
        sender: ConnectionId,
    ) -> DeliveryReport {
        let members = self.registry.members(room_id).await;
        let mut report = DeliveryReport::default();

        for peer in members.iter().filter(|peer| peer.id != sender) {
            report.attempted += 1;
            match peer.deliver(&payload) {
                Ok(()) => report.delivered += 1,
                Err(err) => {
                    report.failed += 1;
                    tracing::warn!(
                        %room_id,
                        recipient = %peer.id,
                        recipient_name = %peer.display_name,
                        error = %err,
                        "delivery failed"
                    );
                }
            }
        }

        tracing::debug!(
            %room_id,
            attempted = report.attempted,
            delivered = report.delivered,
            failed = report.failed,
            "broadcast complete"
        );
        report
    }
}
