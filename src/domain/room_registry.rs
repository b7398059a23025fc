//! Concurrent room storage with per-room locking.
//!
//! [`RoomRegistry`] stores all active rooms in a `HashMap` where each entry
//! is individually protected by a [`tokio::sync::RwLock`]. Broadcasts only
//! take a short read lock on the map and a read lock on their own room, so
//! fan-outs in unrelated rooms never serialize on each other.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::room::{Room, RoomSummary};
use super::{ConnectionId, Peer, RoomId};

/// Result of [`RoomRegistry::join`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinReceipt {
    /// `true` if the join created the room.
    pub room_created: bool,
    /// Member count right after the join.
    pub member_count: usize,
}

/// Result of [`RoomRegistry::leave`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// The room does not exist or the connection was not a member.
    NotMember,
    /// The connection left; other members remain.
    Left {
        /// Members still in the room.
        remaining: usize,
    },
    /// The connection was the last member and the room was removed.
    RoomClosed,
}

/// The single shared map from room identifier to room.
///
/// Uses a `RwLock<HashMap<...>>` for the outer map and per-room
/// `Arc<RwLock<Room>>` for fine-grained locking.
///
/// # Concurrency
///
/// - Locks are always acquired outer map first, room second, and the outer
///   guard is released before awaiting a room lock except on the slow join
///   path, which holds the map write lock.
/// - A room emptied by [`leave`](Self::leave) is retired under its own lock
///   and removed under the map write lock only if the map still points to
///   that same room. A join that finds a retired room takes the slow path
///   and installs a fresh one, so no member is ever added to a room that is
///   about to disappear.
/// - After `leave` returns, no empty room it emptied remains in the map.
#[derive(Debug)]
pub struct RoomRegistry {
    rooms: RwLock<HashMap<RoomId, Arc<RwLock<Room>>>>,
}

impl RoomRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
        }
    }

    /// Adds `peer` to `room_id`, creating the room on first use.
    ///
    /// Joining a room the connection is already in refreshes its handle and
    /// leaves the member count unchanged.
    pub async fn join(&self, room_id: &RoomId, peer: Peer) -> JoinReceipt {
        let peer = match self.get(room_id).await {
            Some(room_lock) => {
                let mut room = room_lock.write().await;
                if room.is_retired() {
                    peer
                } else {
                    room.insert(peer);
                    return JoinReceipt {
                        room_created: false,
                        member_count: room.len(),
                    };
                }
            }
            None => peer,
        };

        let mut map = self.rooms.write().await;
        if let Some(room_lock) = map.get(room_id) {
            let mut room = room_lock.write().await;
            if !room.is_retired() {
                room.insert(peer);
                return JoinReceipt {
                    room_created: false,
                    member_count: room.len(),
                };
            }
        }

        let mut room = Room::new(room_id.clone());
        room.insert(peer);
        map.insert(room_id.clone(), Arc::new(RwLock::new(room)));
        tracing::info!(%room_id, active_rooms = map.len(), "room created");
        JoinReceipt {
            room_created: true,
            member_count: 1,
        }
    }

    /// Removes `connection_id` from `room_id`, deleting the room if it
    /// becomes empty. Unknown rooms and non-members are a silent no-op.
    pub async fn leave(&self, room_id: &RoomId, connection_id: ConnectionId) -> LeaveOutcome {
        let Some(room_lock) = self.get(room_id).await else {
            return LeaveOutcome::NotMember;
        };

        {
            let mut room = room_lock.write().await;
            if room.remove(connection_id).is_none() {
                return LeaveOutcome::NotMember;
            }
            if !room.is_empty() {
                return LeaveOutcome::Left {
                    remaining: room.len(),
                };
            }
            room.retire();
        }

        let mut map = self.rooms.write().await;
        let still_current = map
            .get(room_id)
            .is_some_and(|current| Arc::ptr_eq(current, &room_lock));
        if still_current {
            map.remove(room_id);
        }
        tracing::info!(%room_id, active_rooms = map.len(), "room closed");
        LeaveOutcome::RoomClosed
    }

    /// Returns a consistent snapshot of the members of `room_id`.
    ///
    /// The snapshot includes every member; excluding a sender is the
    /// caller's job. Unknown rooms yield an empty list.
    pub async fn members(&self, room_id: &RoomId) -> Vec<Peer> {
        let Some(room_lock) = self.get(room_id).await else {
            return Vec::new();
        };
        let room = room_lock.read().await;
        if room.is_retired() {
            return Vec::new();
        }
        room.peers()
    }

    /// Returns `true` if `room_id` currently has at least one member.
    pub async fn contains(&self, room_id: &RoomId) -> bool {
        match self.get(room_id).await {
            Some(room_lock) => !room_lock.read().await.is_retired(),
            None => false,
        }
    }

    /// Returns the summary of one room, if it is active.
    pub async fn summary(&self, room_id: &RoomId) -> Option<RoomSummary> {
        let room_lock = self.get(room_id).await?;
        let room = room_lock.read().await;
        if room.is_retired() {
            return None;
        }
        Some(RoomSummary::from(&*room))
    }

    /// Returns summaries of all active rooms ordered by identifier.
    pub async fn list(&self) -> Vec<RoomSummary> {
        let map = self.rooms.read().await;
        let mut summaries = Vec::with_capacity(map.len());
        for room_lock in map.values() {
            let room = room_lock.read().await;
            if room.is_retired() {
                continue;
            }
            summaries.push(RoomSummary::from(&*room));
        }
        summaries.sort_by(|a, b| a.room_id.cmp(&b.room_id));
        summaries
    }

    /// Returns the number of rooms in the registry.
    pub async fn len(&self) -> usize {
        self.rooms.read().await.len()
    }

    /// Returns `true` if the registry contains no rooms.
    pub async fn is_empty(&self) -> bool {
        self.rooms.read().await.is_empty()
    }

    async fn get(&self, room_id: &RoomId) -> Option<Arc<RwLock<Room>>> {
        self.rooms.read().await.get(room_id).map(Arc::clone)
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}
