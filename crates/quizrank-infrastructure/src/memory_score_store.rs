//! Embedded ordered score store.
//!
//! Keeps the sorted set in process: a `HashMap` for point lookups and a
//! sorted `Vec` of `(Reverse(score), Reverse(display_key))` whose order is the
//! canonical ranking order (descending score, then descending display key,
//! same as Redis `ZREVRANGE`).
//!
//! Rank lookups are a binary search and range reads a slice, so reads are
//! O(log n + k). Writes shift the vector and are O(n).

use async_trait::async_trait;
use quizrank_core::error::Result;
use quizrank_core::leaderboard::{OrderedScoreStore, Score, ScoreEntry, ensure_exact_score};
use std::cmp::Reverse;
use std::collections::HashMap;
use tokio::sync::RwLock;

type OrderKey = (Reverse<Score>, Reverse<String>);

#[derive(Default)]
struct SortedSet {
    scores: HashMap<String, Score>,
    order: Vec<OrderKey>,
}

impl SortedSet {
    fn order_key(display_key: &str, score: Score) -> OrderKey {
        (Reverse(score), Reverse(display_key.to_string()))
    }

    fn unlink(&mut self, display_key: &str, score: Score) {
        if let Ok(index) = self.order.binary_search(&Self::order_key(display_key, score)) {
            self.order.remove(index);
        }
    }

    fn insert(&mut self, display_key: &str, score: Score) {
        if let Some(previous) = self.scores.insert(display_key.to_string(), score) {
            self.unlink(display_key, previous);
        }
        let key = Self::order_key(display_key, score);
        let index = self.order.binary_search(&key).unwrap_or_else(|index| index);
        self.order.insert(index, key);
    }

    fn remove(&mut self, display_key: &str) -> bool {
        match self.scores.remove(display_key) {
            Some(score) => {
                self.unlink(display_key, score);
                true
            }
            None => false,
        }
    }

    fn position(&self, display_key: &str) -> Option<u64> {
        let score = *self.scores.get(display_key)?;
        self.order
            .binary_search(&Self::order_key(display_key, score))
            .ok()
            .map(|index| index as u64)
    }

    fn slice(&self, start: u64, stop: u64) -> &[OrderKey] {
        let len = self.order.len();
        let start = usize::try_from(start).unwrap_or(usize::MAX).min(len);
        let end = usize::try_from(stop)
            .unwrap_or(usize::MAX)
            .saturating_add(1)
            .min(len);
        if start >= end {
            return &[];
        }
        &self.order[start..end]
    }
}

/// In-process `OrderedScoreStore` for local runs and tests.
///
/// All state sits behind a single `RwLock`, held only for the duration of one
/// call, so each method is atomic for its key just like a Redis command.
#[derive(Default)]
pub struct InMemoryScoreStore {
    set: RwLock<SortedSet>,
}

impl InMemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderedScoreStore for InMemoryScoreStore {
    async fn upsert(&self, display_key: &str, score: Score) -> Result<()> {
        ensure_exact_score(score)?;
        self.set.write().await.insert(display_key, score);
        Ok(())
    }

    async fn score(&self, display_key: &str) -> Result<Option<Score>> {
        Ok(self.set.read().await.scores.get(display_key).copied())
    }

    async fn remove(&self, display_key: &str) -> Result<bool> {
        Ok(self.set.write().await.remove(display_key))
    }

    async fn cardinality(&self) -> Result<u64> {
        Ok(self.set.read().await.scores.len() as u64)
    }

    async fn clear(&self) -> Result<()> {
        let mut set = self.set.write().await;
        set.scores.clear();
        set.order.clear();
        Ok(())
    }

    async fn rev_rank(&self, display_key: &str) -> Result<Option<u64>> {
        Ok(self.set.read().await.position(display_key))
    }

    async fn rev_range(&self, start: u64, stop: u64) -> Result<Vec<ScoreEntry>> {
        if start > stop {
            return Ok(Vec::new());
        }

        let set = self.set.read().await;
        Ok(set
            .slice(start, stop)
            .iter()
            .map(|(Reverse(score), Reverse(key))| ScoreEntry::new(key.clone(), *score))
            .collect())
    }
}
