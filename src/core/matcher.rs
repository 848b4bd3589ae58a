use std::collections::HashSet;
use std::sync::Arc;

use crate::core::scoring::cosine_similarity;
use crate::models::{BestMatch, MatchOutcome, MatchPair, UserInterests};
use crate::services::{InterestStore, MatchStore, StoreError};

/// Pick the highest-scoring candidate
///
/// Ties keep the candidate seen first, so the result is reproducible for a
/// given candidate order. Returns the candidate's index and its score.
pub fn select_best(interests: &[String], candidates: &[UserInterests]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;

    for (idx, candidate) in candidates.iter().enumerate() {
        let score = cosine_similarity(interests, &candidate.interests);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((idx, score)),
        }
    }

    best
}

/// Matchmaking engine: scores candidates by interest overlap and records
/// the winning pair exactly once
///
/// # Pipeline Stages
/// 1. Load the requester's interests
/// 2. Load every other user (optionally minus previous partners)
/// 3. Score and select
/// 4. Record the normalized pair
#[derive(Clone)]
pub struct Matcher {
    interests: Arc<dyn InterestStore>,
    matches: Arc<dyn MatchStore>,
    exclude_previous_matches: bool,
}

impl Matcher {
    pub fn new(interests: Arc<dyn InterestStore>, matches: Arc<dyn MatchStore>) -> Self {
        Self {
            interests,
            matches,
            exclude_previous_matches: false,
        }
    }

    /// Skip candidates the requester has already been paired with
    pub fn exclude_previous_matches(mut self, exclude: bool) -> Self {
        self.exclude_previous_matches = exclude;
        self
    }

    /// Find and record the best match for `user_id`
    ///
    /// Fails with `StoreError::NotFound` for unknown users. An empty candidate
    /// pool is a normal outcome, reported as `MatchOutcome::NoCandidates`.
    /// If the pair was already recorded the match is still returned.
    pub async fn find_best_match(&self, user_id: &str) -> Result<MatchOutcome, StoreError> {
        let interests = self.interests.get(user_id).await?;
        let mut candidates = self.interests.list_except(user_id).await?;

        if self.exclude_previous_matches {
            let partners: HashSet<String> =
                self.matches.partners_of(user_id).await?.into_iter().collect();
            if !partners.is_empty() {
                candidates.retain(|c| !partners.contains(&c.user_id));
                tracing::debug!(
                    "Excluded {} previous partners for {}",
                    partners.len(),
                    user_id
                );
            }
        }

        tracing::debug!("Scoring {} candidates for {}", candidates.len(), user_id);

        let (idx, score) = match select_best(&interests, &candidates) {
            Some(best) => best,
            None => {
                tracing::info!("No candidates available for {}", user_id);
                return Ok(MatchOutcome::NoCandidates);
            }
        };

        let matched_user = candidates.swap_remove(idx).user_id;

        let newly_recorded = match MatchPair::new(user_id, &matched_user) {
            Some(pair) => self.matches.insert_if_absent(&pair).await?,
            // list_except never returns the requester, but a store could
            None => false,
        };

        tracing::info!(
            "Matched {} with {} (score {:.4}, new record: {})",
            user_id,
            matched_user,
            score,
            newly_recorded
        );

        Ok(MatchOutcome::Matched(BestMatch {
            matched_user,
            score,
            newly_recorded,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::InMemoryStore;
    use async_trait::async_trait;
    use std::time::Duration;

    /// Match sink whose backend is unreachable
    struct UnreachableMatches;

    #[async_trait]
    impl MatchStore for UnreachableMatches {
        async fn insert_if_absent(&self, _pair: &MatchPair) -> Result<bool, StoreError> {
            Err(StoreError::Timeout(Duration::from_secs(5)))
        }

        async fn partners_of(&self, _user_id: &str) -> Result<Vec<String>, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }
    }

    fn candidate(id: &str, interests: &[&str]) -> UserInterests {
        UserInterests::new(id, interests.iter().map(|s| s.to_string()).collect())
    }

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_select_best_picks_highest() {
        let me = tokens(&["music", "hiking"]);
        let candidates = vec![
            candidate("a", &["chess"]),
            candidate("b", &["music", "hiking"]),
            candidate("c", &["music"]),
        ];

        let (idx, score) = select_best(&me, &candidates).unwrap();
        assert_eq!(idx, 1);
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_select_best_tie_keeps_first() {
        let me = tokens(&["music"]);
        let candidates = vec![
            candidate("x", &["music", "golf"]),
            candidate("y", &["music", "chess"]),
        ];

        let (idx, _) = select_best(&me, &candidates).unwrap();
        assert_eq!(idx, 0);
    }

    #[test]
    fn test_select_best_zero_scores_still_select() {
        let me = tokens(&["music"]);
        let candidates = vec![candidate("x", &["golf"])];
        assert_eq!(select_best(&me, &candidates), Some((0, 0.0)));
    }

    #[test]
    fn test_select_best_empty() {
        assert_eq!(select_best(&tokens(&["music"]), &[]), None);
    }

    #[tokio::test]
    async fn test_find_best_match_records_once() {
        let store = Arc::new(InMemoryStore::new());
        store.upsert("alice", &tokens(&["music", "hiking"])).await.unwrap();
        store.upsert("bob", &tokens(&["music", "hiking"])).await.unwrap();

        let matcher = Matcher::new(store.clone(), store.clone());

        let first = matcher.find_best_match("alice").await.unwrap();
        let second = matcher.find_best_match("bob").await.unwrap();

        match (first, second) {
            (MatchOutcome::Matched(a), MatchOutcome::Matched(b)) => {
                assert_eq!(a.matched_user, "bob");
                assert!(a.newly_recorded);
                assert_eq!(b.matched_user, "alice");
                assert!(!b.newly_recorded);
            }
            other => panic!("unexpected outcomes: {:?}", other),
        }
        assert_eq!(store.match_count().await, 1);
    }

    #[tokio::test]
    async fn test_exclude_previous_matches() {
        let store = Arc::new(InMemoryStore::new());
        store.upsert("alice", &tokens(&["music"])).await.unwrap();
        store.upsert("bob", &tokens(&["music"])).await.unwrap();
        store.upsert("carol", &tokens(&["music", "golf"])).await.unwrap();

        let matcher = Matcher::new(store.clone(), store.clone()).exclude_previous_matches(true);

        let first = matcher.find_best_match("alice").await.unwrap();
        let second = matcher.find_best_match("alice").await.unwrap();
        let third = matcher.find_best_match("alice").await.unwrap();

        assert!(matches!(first, MatchOutcome::Matched(ref m) if m.matched_user == "bob"));
        assert!(matches!(second, MatchOutcome::Matched(ref m) if m.matched_user == "carol"));
        assert_eq!(third, MatchOutcome::NoCandidates);
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let store = Arc::new(InMemoryStore::new());
        let matcher = Matcher::new(store.clone(), store);

        let err = matcher.find_best_match("ghost").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_record_failure_is_not_swallowed() {
        let store = Arc::new(InMemoryStore::new());
        store.upsert("alice", &tokens(&["music"])).await.unwrap();
        store.upsert("bob", &tokens(&["music"])).await.unwrap();

        let matcher = Matcher::new(store, Arc::new(UnreachableMatches));

        let err = matcher.find_best_match("alice").await.unwrap_err();
        assert!(matches!(err, StoreError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_partner_lookup_failure_is_not_swallowed() {
        let store = Arc::new(InMemoryStore::new());
        store.upsert("alice", &tokens(&["music"])).await.unwrap();
        store.upsert("bob", &tokens(&["music"])).await.unwrap();

        let matcher =
            Matcher::new(store, Arc::new(UnreachableMatches)).exclude_previous_matches(true);

        let err = matcher.find_best_match("alice").await.unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));
    }
}
