//! Realtime wire events exchanged over the signaling socket.
//!
//! Every frame is a JSON object `{ "event": <name>, "data": { ... } }`.
//! Negotiation payloads (`sdp`, `candidate`) are carried as opaque JSON
//! values and never inspected.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::domain::NegotiationKind;

/// Events a client sends to the relay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    JoinRoom {
        #[serde(rename = "roomId")]
        room_id: String,
        #[serde(rename = "userId")]
        user_id: String,
    },
    Offer {
        #[serde(rename = "roomId")]
        room_id: String,
        sdp: Value,
    },
    Answer {
        #[serde(rename = "roomId")]
        room_id: String,
        sdp: Value,
    },
    IceCandidate {
        #[serde(rename = "roomId")]
        room_id: String,
        candidate: Value,
    },
    DisconnectCall {
        #[serde(rename = "roomId")]
        room_id: String,
    },
}

impl ClientEvent {
    pub fn room_id(&self) -> &str {
        match self {
            ClientEvent::JoinRoom { room_id, .. }
            | ClientEvent::Offer { room_id, .. }
            | ClientEvent::Answer { room_id, .. }
            | ClientEvent::IceCandidate { room_id, .. }
            | ClientEvent::DisconnectCall { room_id } => room_id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::JoinRoom { .. } => "join-room",
            ClientEvent::Offer { .. } => "offer",
            ClientEvent::Answer { .. } => "answer",
            ClientEvent::IceCandidate { .. } => "ice-candidate",
            ClientEvent::DisconnectCall { .. } => "disconnect-call",
        }
    }
}

/// Events the relay delivers to room members
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    PeerJoined {
        #[serde(rename = "userId")]
        user_id: String,
    },
    Offer {
        sdp: Value,
    },
    Answer {
        sdp: Value,
    },
    IceCandidate {
        candidate: Value,
    },
    CallEnded {
        #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
        user_id: Option<String>,
    },
    PeerLeft {
        #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
        user_id: Option<String>,
    },
}

impl ServerEvent {
    /// Wrap a negotiation payload verbatim under the field name its kind uses
    pub fn negotiation(kind: NegotiationKind, payload: Value) -> Self {
        match kind {
            NegotiationKind::Offer => ServerEvent::Offer { sdp: payload },
            NegotiationKind::Answer => ServerEvent::Answer { sdp: payload },
            NegotiationKind::IceCandidate => ServerEvent::IceCandidate { candidate: payload },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_join_room() {
        let event: ClientEvent = serde_json::from_value(json!({
            "event": "join-room",
            "data": { "roomId": "r1", "userId": "alice" }
        }))
        .unwrap();

        assert_eq!(
            event,
            ClientEvent::JoinRoom {
                room_id: "r1".to_string(),
                user_id: "alice".to_string(),
            }
        );
        assert_eq!(event.room_id(), "r1");
    }

    #[test]
    fn test_parse_ice_candidate_keeps_payload_opaque() {
        let candidate = json!({ "candidate": "candidate:1 1 UDP 2122252543 10.0.0.1 54400 typ host", "sdpMLineIndex": 0 });
        let event: ClientEvent = serde_json::from_value(json!({
            "event": "ice-candidate",
            "data": { "roomId": "r1", "candidate": candidate.clone() }
        }))
        .unwrap();

        match event {
            ClientEvent::IceCandidate { candidate: got, .. } => assert_eq!(got, candidate),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_missing_room_id_is_rejected() {
        let parsed = serde_json::from_value::<ClientEvent>(json!({
            "event": "offer",
            "data": { "sdp": "v=0" }
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_unknown_event_is_rejected() {
        let parsed = serde_json::from_value::<ClientEvent>(json!({
            "event": "shout",
            "data": { "roomId": "r1" }
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_server_event_wire_format() {
        let event = ServerEvent::negotiation(NegotiationKind::Answer, json!("v=0"));
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({ "event": "answer", "data": { "sdp": "v=0" } })
        );

        let left = ServerEvent::PeerLeft { user_id: None };
        assert_eq!(
            serde_json::to_value(&left).unwrap(),
            json!({ "event": "peer-left", "data": {} })
        );
    }
}
