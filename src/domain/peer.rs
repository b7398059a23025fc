//! Room member handle.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use super::ConnectionId;
use crate::error::DeliveryError;

/// Payload queued for delivery to one connection.
///
/// The same allocation is shared by every recipient of a fan-out.
pub type Outbound = Arc<str>;

/// A connection as seen by the registry and the relay.
///
/// Cloning a `Peer` clones the sending half of the connection's bounded
/// outbound queue; the receiving half is drained by the owning session,
/// which alone writes to the transport.
#[derive(Debug, Clone)]
pub struct Peer {
    /// Stable identity of the connection.
    pub id: ConnectionId,
    /// Advisory display name. Used for logs and acknowledgements only.
    pub display_name: String,
    /// When the connection joined its room.
    pub joined_at: DateTime<Utc>,
    outbound: mpsc::Sender<Outbound>,
}

impl Peer {
    /// Creates a peer handle around the sending half of an outbound queue.
    #[must_use]
    pub fn new(
        id: ConnectionId,
        display_name: impl Into<String>,
        outbound: mpsc::Sender<Outbound>,
    ) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            joined_at: Utc::now(),
            outbound,
        }
    }

    /// Queues `payload` for this peer without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::QueueFull`] when the peer is not draining its
    /// queue fast enough and [`DeliveryError::Disconnected`] when its session
    /// is gone.
    pub fn deliver(&self, payload: &Outbound) -> Result<(), DeliveryError> {
        self.outbound
            .try_send(Arc::clone(payload))
            .map_err(|err| match err {
                TrySendError::Full(_) => DeliveryError::QueueFull,
                TrySendError::Closed(_) => DeliveryError::Disconnected,
            })
    }

    /// Returns `true` once the owning session dropped its queue receiver.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.outbound.is_closed()
    }
}
