use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::future::Future;
use std::time::Duration;

use crate::models::{MatchPair, UserInterests};
use crate::services::{validate_upsert, InterestStore, MatchStore, StoreError};

const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// PostgreSQL-backed store for user interests and match records
///
/// Every call is bounded by `query_timeout`; expiry surfaces as
/// `StoreError::Timeout` and is not retried here.
pub struct PostgresClient {
    pool: PgPool,
    query_timeout: Duration,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        query_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self {
            pool,
            query_timeout,
        })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        query_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            query_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_QUERY_TIMEOUT),
        )
        .await
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.query_timeout, fut).await {
            Ok(result) => result.map_err(StoreError::from),
            Err(_) => Err(StoreError::Timeout(self.query_timeout)),
        }
    }
}

#[async_trait]
impl InterestStore for PostgresClient {
    /// Uses INSERT ... ON CONFLICT so the last write wins.
    async fn upsert(&self, user_id: &str, interests: &[String]) -> Result<(), StoreError> {
        validate_upsert(user_id, interests)?;

        let query = r#"
            INSERT INTO users (user_id, interests, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id)
            DO UPDATE SET
                interests = EXCLUDED.interests,
                updated_at = EXCLUDED.updated_at
        "#;

        self.bounded(
            sqlx::query(query)
                .bind(user_id)
                .bind(interests)
                .execute(&self.pool),
        )
        .await?;

        tracing::debug!("Upserted {} interests for {}", interests.len(), user_id);
        Ok(())
    }

    async fn get(&self, user_id: &str) -> Result<Vec<String>, StoreError> {
        let query = r#"
            SELECT interests
            FROM users
            WHERE user_id = $1
        "#;

        let row = self
            .bounded(sqlx::query(query).bind(user_id).fetch_optional(&self.pool))
            .await?;

        match row {
            Some(row) => Ok(row.try_get("interests")?),
            None => Err(StoreError::NotFound(user_id.to_string())),
        }
    }

    async fn list_except(&self, user_id: &str) -> Result<Vec<UserInterests>, StoreError> {
        let query = r#"
            SELECT user_id, interests
            FROM users
            WHERE user_id <> $1
            ORDER BY user_id
        "#;

        let rows = self
            .bounded(sqlx::query(query).bind(user_id).fetch_all(&self.pool))
            .await?;

        let users = rows
            .iter()
            .map(|row| {
                Ok(UserInterests {
                    user_id: row.try_get("user_id")?,
                    interests: row.try_get("interests")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        tracing::debug!("Loaded {} candidates excluding {}", users.len(), user_id);
        Ok(users)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        self.bounded(sqlx::query("SELECT 1").fetch_one(&self.pool))
            .await
            .map(|_| true)
    }
}

#[async_trait]
impl MatchStore for PostgresClient {
    async fn insert_if_absent(&self, pair: &MatchPair) -> Result<bool, StoreError> {
        let query = r#"
            INSERT INTO matches (user_a, user_b, created_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_a, user_b) DO NOTHING
        "#;

        let result = self
            .bounded(
                sqlx::query(query)
                    .bind(pair.first())
                    .bind(pair.second())
                    .execute(&self.pool),
            )
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn partners_of(&self, user_id: &str) -> Result<Vec<String>, StoreError> {
        let query = r#"
            SELECT CASE WHEN user_a = $1 THEN user_b ELSE user_a END AS partner
            FROM matches
            WHERE user_a = $1 OR user_b = $1
        "#;

        let rows = self
            .bounded(sqlx::query(query).bind(user_id).fetch_all(&self.pool))
            .await?;

        let partners = rows
            .iter()
            .map(|row| row.try_get("partner"))
            .collect::<Result<Vec<String>, sqlx::Error>>()?;

        Ok(partners)
    }
}
