// Service exports
pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PostgresClient;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::models::{MatchPair, UserInterests};

/// Errors surfaced by the persistence layer
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("SQLx error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Storage call timed out after {0:?}")]
    Timeout(Duration),
}

/// Durable mapping from user identity to normalized interests
#[async_trait]
pub trait InterestStore: Send + Sync {
    /// Replace the interests stored for `user_id`
    async fn upsert(&self, user_id: &str, interests: &[String]) -> Result<(), StoreError>;

    /// Interests stored for `user_id`, or `StoreError::NotFound`
    async fn get(&self, user_id: &str) -> Result<Vec<String>, StoreError>;

    /// Every other user's interests, in an order that is stable for the call
    async fn list_except(&self, user_id: &str) -> Result<Vec<UserInterests>, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}

/// Sink for committed pairings
#[async_trait]
pub trait MatchStore: Send + Sync {
    /// Insert the pair unless it already exists.
    ///
    /// Returns `true` when a new record was written, `false` when the
    /// unordered pair was already present.
    async fn insert_if_absent(&self, pair: &MatchPair) -> Result<bool, StoreError>;

    /// Identities already paired with `user_id`
    async fn partners_of(&self, user_id: &str) -> Result<Vec<String>, StoreError>;
}

/// Reject malformed upserts before any storage access
pub fn validate_upsert(user_id: &str, interests: &[String]) -> Result<(), StoreError> {
    if user_id.trim().is_empty() {
        return Err(StoreError::Validation("userId must not be empty".to_string()));
    }
    if interests.is_empty() {
        return Err(StoreError::Validation(
            "interests must contain at least one entry".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_upsert() {
        let interests = vec!["music".to_string()];
        assert!(validate_upsert("alice", &interests).is_ok());
        assert!(matches!(
            validate_upsert("  ", &interests),
            Err(StoreError::Validation(_))
        ));
        assert!(matches!(
            validate_upsert("alice", &[]),
            Err(StoreError::Validation(_))
        ));
    }
}
