//! Scoped room membership for a joined session.

use std::sync::Arc;

use crate::domain::{ConnectionId, JoinReceipt, LeaveOutcome, Peer, RoomId, RoomRegistry};

/// Proof that a session is registered in a room.
///
/// Created by [`RoomMembership::join`] and consumed by
/// [`RoomMembership::release`]. If the owning session is dropped before
/// releasing (task abort, panic, runtime shutdown), `Drop` schedules the
/// `leave` on the current runtime so the registry never keeps a member
/// whose session is gone.
#[derive(Debug)]
pub struct RoomMembership {
    registry: Arc<RoomRegistry>,
    room_id: RoomId,
    connection_id: ConnectionId,
    released: bool,
}

impl RoomMembership {
    /// Joins `peer` into `room_id`.
    ///
    /// The guard is armed before the registry is touched, so cancelling
    /// this future still results in a `leave`.
    pub async fn join(
        registry: Arc<RoomRegistry>,
        room_id: RoomId,
        peer: Peer,
    ) -> (Self, JoinReceipt) {
        let membership = Self {
            registry,
            room_id,
            connection_id: peer.id,
            released: false,
        };
        let receipt = membership.registry.join(&membership.room_id, peer).await;
        (membership, receipt)
    }

    /// Room this membership belongs to.
    #[must_use]
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Leaves the room.
    pub async fn release(mut self) -> LeaveOutcome {
        let outcome = self.registry.leave(&self.room_id, self.connection_id).await;
        self.released = true;
        outcome
    }
}

impl Drop for RoomMembership {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        let registry = Arc::clone(&self.registry);
        let room_id = self.room_id.clone();
        let connection_id = self.connection_id;
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    let outcome = registry.leave(&room_id, connection_id).await;
                    tracing::debug!(%room_id, %connection_id, ?outcome, "membership released on drop");
                });
            }
            Err(_) => {
                tracing::warn!(%room_id, %connection_id, "no runtime to release membership");
            }
        }
    }
}
