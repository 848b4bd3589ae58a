//! Room membership for live signaling connections.
//!
//! Rooms are created on first join and dropped as soon as their last member
//! leaves. Nothing here is persisted.

use dashmap::DashMap;
use std::collections::HashMap;
use tokio::sync::mpsc::UnboundedSender;

use crate::models::{ConnectionId, ServerEvent};

/// Handle to one live connection: its id plus the queue feeding its socket
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: ConnectionId,
    outbox: UnboundedSender<ServerEvent>,
}

impl SessionHandle {
    pub fn new(id: ConnectionId, outbox: UnboundedSender<ServerEvent>) -> Self {
        Self { id, outbox }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queue an event for this connection.
    ///
    /// Returns `false` if the connection's writer has already gone away.
    pub fn deliver(&self, event: ServerEvent) -> bool {
        self.outbox.send(event).is_ok()
    }
}

impl PartialEq for SessionHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for SessionHandle {}

/// Room id → members currently joined
///
/// Each room's member set sits behind its own map shard lock, so join, leave
/// and fan-out on one room are mutually exclusive without serializing
/// unrelated rooms.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: DashMap<String, HashMap<ConnectionId, SessionHandle>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `session` to `room_id`, creating the room if needed.
    ///
    /// Returns `false` when the session was already a member.
    pub fn join(&self, room_id: &str, session: &SessionHandle) -> bool {
        self.rooms
            .entry(room_id.to_string())
            .or_default()
            .insert(session.id(), session.clone())
            .is_none()
    }

    /// Remove the session from `room_id`; an emptied room is dropped.
    ///
    /// Returns `true` if the session was a member.
    pub fn leave(&self, room_id: &str, session_id: ConnectionId) -> bool {
        let removed = match self.rooms.get_mut(room_id) {
            Some(mut members) => members.remove(&session_id).is_some(),
            None => false,
        };
        self.rooms.remove_if(room_id, |_, members| members.is_empty());
        removed
    }

    /// Everyone in `room_id` except `session_id`; empty if the room is absent
    pub fn members_except(&self, room_id: &str, session_id: ConnectionId) -> Vec<SessionHandle> {
        self.rooms
            .get(room_id)
            .map(|members| {
                members
                    .values()
                    .filter(|member| member.id() != session_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn is_member(&self, room_id: &str, session_id: ConnectionId) -> bool {
        self.rooms
            .get(room_id)
            .map(|members| members.contains_key(&session_id))
            .unwrap_or(false)
    }

    /// Rooms `session_id` is currently a member of
    pub fn rooms_of(&self, session_id: ConnectionId) -> Vec<String> {
        self.rooms
            .iter()
            .filter(|entry| entry.value().contains_key(&session_id))
            .map(|entry| entry.key().clone())
            .collect()
    }

    pub fn member_ids(&self, room_id: &str) -> Vec<ConnectionId> {
        self.rooms
            .get(room_id)
            .map(|members| members.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn contains_room(&self, room_id: &str) -> bool {
        self.rooms.contains_key(room_id)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
