use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A user identity together with its normalized interest tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInterests {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub interests: Vec<String>,
}

impl UserInterests {
    pub fn new(user_id: impl Into<String>, interests: Vec<String>) -> Self {
        Self {
            user_id: user_id.into(),
            interests,
        }
    }
}

/// Unordered pair of distinct identities, stored in lexicographic order
///
/// `MatchPair::new("bob", "alice")` and `MatchPair::new("alice", "bob")`
/// compare equal, which is what makes match recording idempotent.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MatchPair {
    #[serde(rename = "matchedUser1")]
    first: String,
    #[serde(rename = "matchedUser2")]
    second: String,
}

impl MatchPair {
    /// Returns `None` when both sides name the same identity
    pub fn new(a: &str, b: &str) -> Option<Self> {
        match a.cmp(b) {
            std::cmp::Ordering::Less => Some(Self {
                first: a.to_string(),
                second: b.to_string(),
            }),
            std::cmp::Ordering::Greater => Some(Self {
                first: b.to_string(),
                second: a.to_string(),
            }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn second(&self) -> &str {
        &self.second
    }

    /// The other side of the pair, if `user_id` is part of it
    pub fn partner_of(&self, user_id: &str) -> Option<&str> {
        if self.first == user_id {
            Some(&self.second)
        } else if self.second == user_id {
            Some(&self.first)
        } else {
            None
        }
    }
}

/// Best candidate selected by the matcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestMatch {
    #[serde(rename = "matchedUser")]
    pub matched_user: String,
    pub score: f64,
    /// `false` when the pair had already been recorded by an earlier request
    #[serde(skip)]
    pub newly_recorded: bool,
}

/// Result of a match request for a known user
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    Matched(BestMatch),
    NoCandidates,
}

/// Opaque identifier of one live realtime connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The three negotiation message kinds the relay forwards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NegotiationKind {
    Offer,
    Answer,
    IceCandidate,
}

impl NegotiationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NegotiationKind::Offer => "offer",
            NegotiationKind::Answer => "answer",
            NegotiationKind::IceCandidate => "ice-candidate",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_pair_is_unordered() {
        let ab = MatchPair::new("alice", "bob").unwrap();
        let ba = MatchPair::new("bob", "alice").unwrap();
        assert_eq!(ab, ba);
        assert_eq!(ab.first(), "alice");
        assert_eq!(ab.second(), "bob");
    }

    #[test]
    fn test_match_pair_rejects_self() {
        assert!(MatchPair::new("alice", "alice").is_none());
    }

    #[test]
    fn test_partner_of() {
        let pair = MatchPair::new("carol", "alice").unwrap();
        assert_eq!(pair.partner_of("alice"), Some("carol"));
        assert_eq!(pair.partner_of("carol"), Some("alice"));
        assert_eq!(pair.partner_of("bob"), None);
    }

    #[test]
    fn test_connection_ids_are_distinct() {
        assert_ne!(ConnectionId::new(), ConnectionId::new());
    }
}
