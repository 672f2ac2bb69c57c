//! Store traits.
//!
//! Defines the two capability sets the ranking code runs on. All leaderboard
//! state lives behind these traits; nothing in the core keeps its own copy.

use async_trait::async_trait;

use super::model::{Score, ScoreEntry};
use crate::error::{LeaderboardError, Result};

/// Largest score magnitude every backend stores exactly (2^53).
///
/// Redis keeps sorted-set scores as doubles; beyond this bound neighbouring
/// integers collapse onto the same value.
pub const MAX_EXACT_SCORE: Score = 1 << 53;

/// Rejects scores a double-backed sorted set cannot hold exactly.
pub fn ensure_exact_score(score: Score) -> Result<()> {
    if (-MAX_EXACT_SCORE..=MAX_EXACT_SCORE).contains(&score) {
        Ok(())
    } else {
        Err(LeaderboardError::validation(format!(
            "score {} is outside the supported range of +/-{}",
            score, MAX_EXACT_SCORE
        )))
    }
}

/// An ordered set of display keys sorted by score (sorted-set semantics).
///
/// The canonical order is descending score, then descending display key among
/// equal scores. That is the order Redis `ZREVRANGE` produces natively, and
/// every implementation must reproduce it so rankings are backend-independent.
///
/// # Implementation Notes
///
/// - Each method is atomic for a single key; no cross-key transactions.
/// - `Err(_)` means the backend could not be reached or rejected the command.
///   An absent key is never an error.
#[async_trait]
pub trait OrderedScoreStore: Send + Sync {
    /// Sets or overwrites the score for `display_key` (`ZADD`).
    ///
    /// Scores outside `+/-MAX_EXACT_SCORE` are rejected with
    /// `LeaderboardError::Validation` and nothing is written.
    async fn upsert(&self, display_key: &str, score: Score) -> Result<()>;

    /// Returns the stored score (`ZSCORE`).
    ///
    /// # Returns
    ///
    /// - `Ok(Some(score))`: Key present
    /// - `Ok(None)`: Key absent
    /// - `Err(_)`: Backend failure
    async fn score(&self, display_key: &str) -> Result<Option<Score>>;

    /// Removes the key (`ZREM`). Returns whether anything was removed.
    async fn remove(&self, display_key: &str) -> Result<bool>;

    /// Number of entries (`ZCARD`).
    async fn cardinality(&self) -> Result<u64>;

    /// Drops every entry (`DEL`).
    async fn clear(&self) -> Result<()>;

    /// 0-based position of the key in the canonical order (`ZREVRANK`).
    async fn rev_rank(&self, display_key: &str) -> Result<Option<u64>>;

    /// Entries at positions `start..=stop` of the canonical order
    /// (`ZREVRANGE ... WITHSCORES`).
    ///
    /// Out-of-range bounds are clamped: `stop` past the end returns up to the
    /// last entry, `start` past the end returns an empty vector.
    async fn rev_range(&self, start: u64, stop: u64) -> Result<Vec<ScoreEntry>>;
}

/// A flat map of display key -> opaque serialized blob (`HSET`/`HGET`/`HDEL`).
#[async_trait]
pub trait KeyedBlobStore: Send + Sync {
    /// Overwrites the blob stored under `field`.
    async fn put(&self, field: &str, value: String) -> Result<()>;

    /// Returns the raw blob, if any.
    async fn get(&self, field: &str) -> Result<Option<String>>;

    /// Removes the blob. Returns whether anything was removed.
    async fn remove(&self, field: &str) -> Result<bool>;

    /// Drops every blob.
    async fn clear(&self) -> Result<()>;
}
