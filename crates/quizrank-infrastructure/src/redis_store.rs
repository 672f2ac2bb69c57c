//! # Redis
//!
//! Shared in-memory backend for the leaderboard.
//!
//! ## Layout
//!
//! - Sorted set `quiz_leaderboard`: member = display key, score = points
//! - Hash `user_data`: field = display key, value = profile JSON
//!
//! Both keys are configurable. Redis already serialises commands, so every
//! method here is one round trip and atomic for its key; nothing is wrapped
//! in `MULTI`. Ties inside the sorted set come back in descending member
//! order from `ZREVRANGE`/`ZREVRANK`, which is the canonical ranking order.
//!
//! Redis keeps scores as doubles. `upsert` rejects anything beyond
//! `MAX_EXACT_SCORE` so every stored score reads back unchanged.

use std::time::Duration;

use async_trait::async_trait;
use quizrank_core::LeaderboardError;
use quizrank_core::config::RedisSettings;
use quizrank_core::error::Result;
use quizrank_core::leaderboard::{
    KeyedBlobStore, OrderedScoreStore, Score, ScoreEntry, ensure_exact_score,
};
use redis::{
    AsyncCommands, Client, RedisError,
    aio::{ConnectionManager, ConnectionManagerConfig},
};

fn backend_error(operation: &str, err: RedisError) -> LeaderboardError {
    LeaderboardError::backend(format!("Redis {} failed: {}", operation, err))
}

fn to_isize(value: u64) -> isize {
    isize::try_from(value).unwrap_or(isize::MAX)
}

/// Opens a connection manager for the configured Redis URL.
///
/// The manager reconnects on its own; a single one is shared (cloned) by both
/// stores.
pub async fn connect(settings: &RedisSettings) -> Result<ConnectionManager> {
    let client = Client::open(settings.url.as_str())
        .map_err(|e| LeaderboardError::config(format!("Invalid Redis URL: {}", e)))?;

    let config = ConnectionManagerConfig::new().set_number_of_retries(settings.connection_retries);

    let connect = client.get_connection_manager_with_config(config);
    let manager = tokio::time::timeout(Duration::from_millis(settings.connection_timeout_ms), connect)
        .await
        .map_err(|_| {
            LeaderboardError::backend(format!(
                "Timed out connecting to Redis at {} after {}ms",
                settings.url, settings.connection_timeout_ms
            ))
        })?
        .map_err(|e| backend_error("connect", e))?;

    tracing::info!("[Redis] Connected to {}", settings.url);
    Ok(manager)
}

/// `OrderedScoreStore` on a Redis sorted set.
#[derive(Clone)]
pub struct RedisScoreStore {
    connection: ConnectionManager,
    key: String,
}

impl RedisScoreStore {
    pub fn new(connection: ConnectionManager, key: impl Into<String>) -> Self {
        Self {
            connection,
            key: key.into(),
        }
    }
}

#[async_trait]
impl OrderedScoreStore for RedisScoreStore {
    async fn upsert(&self, display_key: &str, score: Score) -> Result<()> {
        ensure_exact_score(score)?;

        let mut conn = self.connection.clone();
        let _: () = conn
            .zadd(&self.key, display_key, score)
            .await
            .map_err(|e| backend_error("ZADD", e))?;
        Ok(())
    }

    async fn score(&self, display_key: &str) -> Result<Option<Score>> {
        let mut conn = self.connection.clone();
        let score: Option<f64> = conn
            .zscore(&self.key, display_key)
            .await
            .map_err(|e| backend_error("ZSCORE", e))?;
        Ok(score.map(|s| s.round() as Score))
    }

    async fn remove(&self, display_key: &str) -> Result<bool> {
        let mut conn = self.connection.clone();
        let removed: u64 = conn
            .zrem(&self.key, display_key)
            .await
            .map_err(|e| backend_error("ZREM", e))?;
        Ok(removed > 0)
    }

    async fn cardinality(&self) -> Result<u64> {
        let mut conn = self.connection.clone();
        conn.zcard(&self.key)
            .await
            .map_err(|e| backend_error("ZCARD", e))
    }

    async fn clear(&self) -> Result<()> {
        let mut conn = self.connection.clone();
        let _: () = conn
            .del(&self.key)
            .await
            .map_err(|e| backend_error("DEL", e))?;
        Ok(())
    }

    async fn rev_rank(&self, display_key: &str) -> Result<Option<u64>> {
        let mut conn = self.connection.clone();
        conn.zrevrank(&self.key, display_key)
            .await
            .map_err(|e| backend_error("ZREVRANK", e))
    }

    async fn rev_range(&self, start: u64, stop: u64) -> Result<Vec<ScoreEntry>> {
        if start > stop {
            return Ok(Vec::new());
        }

        let mut conn = self.connection.clone();
        let rows: Vec<(String, f64)> = conn
            .zrevrange_withscores(&self.key, to_isize(start), to_isize(stop))
            .await
            .map_err(|e| backend_error("ZREVRANGE", e))?;

        Ok(rows
            .into_iter()
            .map(|(member, score)| ScoreEntry::new(member, score.round() as Score))
            .collect())
    }
}

/// `KeyedBlobStore` on a Redis hash.
#[derive(Clone)]
pub struct RedisBlobStore {
    connection: ConnectionManager,
    key: String,
}

impl RedisBlobStore {
    pub fn new(connection: ConnectionManager, key: impl Into<String>) -> Self {
        Self {
            connection,
            key: key.into(),
        }
    }
}

#[async_trait]
impl KeyedBlobStore for RedisBlobStore {
    async fn put(&self, field: &str, value: String) -> Result<()> {
        let mut conn = self.connection.clone();
        let _: () = conn
            .hset(&self.key, field, value)
            .await
            .map_err(|e| backend_error("HSET", e))?;
        Ok(())
    }

    async fn get(&self, field: &str) -> Result<Option<String>> {
        let mut conn = self.connection.clone();
        conn.hget(&self.key, field)
            .await
            .map_err(|e| backend_error("HGET", e))
    }

    async fn remove(&self, field: &str) -> Result<bool> {
        let mut conn = self.connection.clone();
        let removed: u64 = conn
            .hdel(&self.key, field)
            .await
            .map_err(|e| backend_error("HDEL", e))?;
        Ok(removed > 0)
    }

    async fn clear(&self) -> Result<()> {
        let mut conn = self.connection.clone();
        let _: () = conn
            .del(&self.key)
            .await
            .map_err(|e| backend_error("DEL", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_bounds_saturate() {
        assert_eq!(to_isize(3), 3);
        assert_eq!(to_isize(u64::MAX), isize::MAX);
    }

    #[tokio::test]
    async fn test_invalid_url_is_config_error() {
        let settings = RedisSettings {
            url: "not a url".to_string(),
            ..RedisSettings::default()
        };

        let err = connect(&settings).await.err().unwrap();
        assert!(err.is_config());
    }
}
