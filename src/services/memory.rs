use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::RwLock;

use crate::models::{MatchPair, UserInterests};
use crate::services::{validate_upsert, InterestStore, MatchStore, StoreError};

/// In-process store for users and match records
///
/// Users are kept ordered by identity, so `list_except` always yields the
/// same order for the same contents. State is lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    users: RwLock<BTreeMap<String, Vec<String>>>,
    matches: RwLock<BTreeSet<MatchPair>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed match records
    pub async fn match_count(&self) -> usize {
        self.matches.read().await.len()
    }

    /// Snapshot of all committed match records
    pub async fn all_matches(&self) -> Vec<MatchPair> {
        self.matches.read().await.iter().cloned().collect()
    }
}

#[async_trait]
impl InterestStore for InMemoryStore {
    async fn upsert(&self, user_id: &str, interests: &[String]) -> Result<(), StoreError> {
        validate_upsert(user_id, interests)?;

        self.users
            .write()
            .await
            .insert(user_id.to_string(), interests.to_vec());

        tracing::debug!("Stored {} interests for {}", interests.len(), user_id);
        Ok(())
    }

    async fn get(&self, user_id: &str) -> Result<Vec<String>, StoreError> {
        self.users
            .read()
            .await
            .get(user_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(user_id.to_string()))
    }

    async fn list_except(&self, user_id: &str) -> Result<Vec<UserInterests>, StoreError> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .filter(|(id, _)| id.as_str() != user_id)
            .map(|(id, interests)| UserInterests::new(id.clone(), interests.clone()))
            .collect())
    }
}

#[async_trait]
impl MatchStore for InMemoryStore {
    async fn insert_if_absent(&self, pair: &MatchPair) -> Result<bool, StoreError> {
        Ok(self.matches.write().await.insert(pair.clone()))
    }

    async fn partners_of(&self, user_id: &str) -> Result<Vec<String>, StoreError> {
        let matches = self.matches.read().await;
        Ok(matches
            .iter()
            .filter_map(|pair| pair.partner_of(user_id).map(str::to_string))
            .collect())
    }
}
