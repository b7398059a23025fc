//! Room aggregate: member set plus metadata.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{ConnectionId, Peer, RoomId};

/// A named group of connections that receive each other's broadcasts.
///
/// Each room in the [`super::RoomRegistry`] sits behind its own lock. A room
/// whose last member left is *retired*: it stays empty forever and the
/// registry replaces it if another connection joins the same identifier.
#[derive(Debug)]
pub struct Room {
    /// Room identifier (immutable after creation).
    pub id: RoomId,

    /// Creation timestamp (immutable after creation).
    pub created_at: DateTime<Utc>,

    members: HashMap<ConnectionId, Peer>,
    retired: bool,
}

impl Room {
    /// Creates an empty room.
    #[must_use]
    pub fn new(id: RoomId) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            members: HashMap::new(),
            retired: false,
        }
    }

    /// Adds `peer`, replacing any handle previously stored for the same
    /// connection. Returns `true` if the connection was not yet a member.
    pub fn insert(&mut self, peer: Peer) -> bool {
        self.members.insert(peer.id, peer).is_none()
    }

    /// Removes a member, returning its handle if it was present.
    pub fn remove(&mut self, id: ConnectionId) -> Option<Peer> {
        self.members.remove(&id)
    }

    /// Returns `true` if the connection is a member.
    #[must_use]
    pub fn contains(&self, id: ConnectionId) -> bool {
        self.members.contains_key(&id)
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the room has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Snapshot of all member handles.
    #[must_use]
    pub fn peers(&self) -> Vec<Peer> {
        self.members.values().cloned().collect()
    }

    /// Marks an empty room as no longer joinable.
    pub(crate) fn retire(&mut self) {
        debug_assert!(self.members.is_empty());
        self.retired = true;
    }

    /// Returns `true` once the room was emptied and awaits removal.
    #[must_use]
    pub fn is_retired(&self) -> bool {
        self.retired
    }
}

/// Lightweight view of one member for listings.
#[derive(Debug, Clone, Serialize)]
pub struct MemberSummary {
    /// Connection identifier.
    pub connection_id: ConnectionId,
    /// Advisory display name.
    pub display_name: String,
    /// Join timestamp.
    pub joined_at: DateTime<Utc>,
}

/// Lightweight view of a room for listings.
#[derive(Debug, Clone, Serialize)]
pub struct RoomSummary {
    /// Room identifier.
    pub room_id: RoomId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Members ordered by join time.
    pub members: Vec<MemberSummary>,
}

impl From<&Room> for RoomSummary {
    fn from(room: &Room) -> Self {
        let mut members: Vec<MemberSummary> = room
            .members
            .values()
            .map(|peer| MemberSummary {
                connection_id: peer.id,
                display_name: peer.display_name.clone(),
                joined_at: peer.joined_at,
            })
            .collect();
        members.sort_by_key(|m| m.joined_at);
        Self {
            room_id: room.id.clone(),
            created_at: room.created_at,
            members,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn room(id: &str) -> Room {
        let Ok(id) = RoomId::new(id) else {
            panic!("valid room id");
        };
        Room::new(id)
    }

    fn peer(name: &str) -> Peer {
        let (tx, _rx) = mpsc::channel(1);
        Peer::new(ConnectionId::new(), name, tx)
    }

    #[test]
    fn insert_and_remove() {
        let mut room = room("r");
        let alice = peer("alice");
        let id = alice.id;

        assert!(room.insert(alice));
        assert!(room.contains(id));
        assert_eq!(room.len(), 1);

        assert!(room.remove(id).is_some());
        assert!(room.is_empty());
        assert!(room.remove(id).is_none());
    }

    #[test]
    fn duplicate_insert_is_idempotent() {
        let mut room = room("r");
        let alice = peer("alice");

        assert!(room.insert(alice.clone()));
        assert!(!room.insert(alice));
        assert_eq!(room.len(), 1);
    }

    #[test]
    fn membership_is_by_identity_not_name() {
        let mut room = room("r");
        room.insert(peer("bob"));
        room.insert(peer("bob"));
        assert_eq!(room.len(), 2);
    }

    #[test]
    fn summary_lists_members() {
        let mut room = room("r");
        room.insert(peer("alice"));
        room.insert(peer("bob"));

        let summary = RoomSummary::from(&room);
        assert_eq!(summary.room_id.as_str(), "r");
        assert_eq!(summary.members.len(), 2);
    }

    #[test]
    fn retire_marks_room() {
        let mut room = room("r");
        assert!(!room.is_retired());
        room.retire();
        assert!(room.is_retired());
    }
}
