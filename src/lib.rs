//! Pairwire - interest-based matchmaking with a WebRTC signaling relay
//!
//! Two subsystems live here: a matchmaking engine that pairs users by the
//! cosine similarity of their interest frequencies and records each pairing
//! once, and a room-scoped relay that fans negotiation messages (offer,
//! answer, ICE candidate) out to the other members of a room.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{Matcher, RoomRegistry, SignalRelay, cosine_similarity, normalize_interests};
pub use models::{UserInterests, MatchPair, BestMatch, MatchOutcome, ClientEvent, ServerEvent};
pub use services::{InterestStore, MatchStore, StoreError, InMemoryStore, PostgresClient};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let interests = normalize_interests("Music, hiking");
        assert_eq!(cosine_similarity(&interests, &interests), 1.0);
    }
}
