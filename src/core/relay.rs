use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;

use crate::core::rooms::{RoomRegistry, SessionHandle};
use crate::models::{ClientEvent, ConnectionId, NegotiationKind, ServerEvent};

/// Per-connection relay state
#[derive(Debug)]
struct Connection {
    handle: SessionHandle,
    room: Option<String>,
    user_id: Option<String>,
}

/// Routes negotiation messages between the members of a room
///
/// A connection moves through `connected -> joined -> disconnected` and is
/// a member of at most one room at a time. Every operation is a
/// fire-and-forget fan-out to the other members of the room; the sender
/// never receives its own messages. Payloads are forwarded untouched.
#[derive(Debug)]
pub struct SignalRelay {
    registry: RoomRegistry,
    connections: DashMap<ConnectionId, Connection>,
}

impl SignalRelay {
    pub fn new(registry: RoomRegistry) -> Self {
        Self {
            registry,
            connections: DashMap::new(),
        }
    }

    /// Register a new connection whose outbound events go to `outbox`
    pub fn connect(&self, outbox: UnboundedSender<ServerEvent>) -> SessionHandle {
        let handle = SessionHandle::new(ConnectionId::new(), outbox);
        self.connections.insert(
            handle.id(),
            Connection {
                handle: handle.clone(),
                room: None,
                user_id: None,
            },
        );
        tracing::debug!("Connection {} opened", handle.id());
        handle
    }

    /// Dispatch a parsed client event
    pub fn handle_event(&self, session_id: ConnectionId, event: ClientEvent) {
        match event {
            ClientEvent::JoinRoom { room_id, user_id } => self.on_join(session_id, &room_id, &user_id),
            ClientEvent::Offer { room_id, sdp } => {
                self.on_negotiation_message(session_id, &room_id, NegotiationKind::Offer, sdp)
            }
            ClientEvent::Answer { room_id, sdp } => {
                self.on_negotiation_message(session_id, &room_id, NegotiationKind::Answer, sdp)
            }
            ClientEvent::IceCandidate { room_id, candidate } => self.on_negotiation_message(
                session_id,
                &room_id,
                NegotiationKind::IceCandidate,
                candidate,
            ),
            ClientEvent::DisconnectCall { room_id } => self.on_explicit_hangup(session_id, &room_id),
        }
    }

    /// Join `room_id` and announce the peer to the room.
    ///
    /// Joining a different room first leaves the current one. Joining the
    /// current room again only refreshes the user id reported in later
    /// `call-ended` and `peer-left` events.
    pub fn on_join(&self, session_id: ConnectionId, room_id: &str, user_id: &str) {
        let (handle, previous_room, previous_user) = {
            let Some(mut conn) = self.connections.get_mut(&session_id) else {
                tracing::debug!("Ignoring join from unknown connection {}", session_id);
                return;
            };
            if conn.room.as_deref() == Some(room_id) {
                tracing::debug!("Connection {} already in room {}", session_id, room_id);
                conn.user_id = Some(user_id.to_string());
                return;
            }
            let previous_room = conn.room.replace(room_id.to_string());
            let previous_user = conn.user_id.replace(user_id.to_string());
            (conn.handle.clone(), previous_room, previous_user)
        };

        if let Some(previous) = previous_room {
            self.leave_room(session_id, &previous, previous_user);
        }

        self.registry.join(room_id, &handle);
        let notified = self.broadcast(
            room_id,
            session_id,
            ServerEvent::PeerJoined {
                user_id: user_id.to_string(),
            },
        );

        tracing::info!(
            "User {} joined room {} on connection {} ({} peers notified)",
            user_id,
            room_id,
            session_id,
            notified
        );
    }

    /// Forward an offer, answer or ICE candidate verbatim to the other members
    pub fn on_negotiation_message(
        &self,
        session_id: ConnectionId,
        room_id: &str,
        kind: NegotiationKind,
        payload: Value,
    ) {
        if !self.registry.is_member(room_id, session_id) {
            tracing::debug!(
                "Dropping {} from {}: not a member of room {}",
                kind.as_str(),
                session_id,
                room_id
            );
            return;
        }

        let delivered = self.broadcast(room_id, session_id, ServerEvent::negotiation(kind, payload));
        tracing::trace!(
            "Relayed {} in room {} to {} peers",
            kind.as_str(),
            room_id,
            delivered
        );
    }

    /// Tell the other members the call ended; membership is kept
    pub fn on_explicit_hangup(&self, session_id: ConnectionId, room_id: &str) {
        if !self.registry.is_member(room_id, session_id) {
            tracing::debug!("Dropping hang-up from {}: not in room {}", session_id, room_id);
            return;
        }

        let user_id = self.user_of(session_id);
        self.broadcast(room_id, session_id, ServerEvent::CallEnded { user_id });
        tracing::info!("Call ended in room {} by {}", room_id, session_id);
    }

    /// Drop the connection from every room it joined and notify the remaining members
    pub fn on_disconnect(&self, session_id: ConnectionId) {
        let user_id = self
            .connections
            .remove(&session_id)
            .and_then(|(_, conn)| conn.user_id);

        for room_id in self.registry.rooms_of(session_id) {
            self.leave_room(session_id, &room_id, user_id.clone());
        }

        tracing::debug!("Connection {} closed", session_id);
    }

    /// Number of rooms with at least one member
    pub fn room_count(&self) -> usize {
        self.registry.room_count()
    }

    /// Connections currently joined to `room_id`
    pub fn members(&self, room_id: &str) -> Vec<ConnectionId> {
        self.registry.member_ids(room_id)
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    fn leave_room(&self, session_id: ConnectionId, room_id: &str, user_id: Option<String>) {
        if self.registry.leave(room_id, session_id) {
            self.broadcast(room_id, session_id, ServerEvent::PeerLeft { user_id });
            tracing::info!("Connection {} left room {}", session_id, room_id);
        }
    }

    fn user_of(&self, session_id: ConnectionId) -> Option<String> {
        self.connections
            .get(&session_id)
            .and_then(|conn| conn.user_id.clone())
    }

    /// Deliver `event` to every member of `room_id` except the sender.
    /// Returns how many members accepted it.
    fn broadcast(&self, room_id: &str, sender: ConnectionId, event: ServerEvent) -> usize {
        self.registry
            .members_except(room_id, sender)
            .iter()
            .filter(|member| member.deliver(event.clone()))
            .count()
    }
}
