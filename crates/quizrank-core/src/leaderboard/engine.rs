//! Ranking engine.
//!
//! A pure query layer over an [`OrderedScoreStore`]: it computes ranks, top-N
//! slices and neighbourhood windows but owns no data itself.

use std::sync::Arc;

use super::model::{NeighborEntry, RankedEntry};
use super::store::OrderedScoreStore;
use crate::error::Result;

/// Computes 1-based descending ranks over an ordered score store.
///
/// Rank of an entry is its position in the store's canonical order plus one:
/// the number of entries with a strictly greater score, plus the tied entries
/// ordered before it, plus one. Ties therefore never share a rank.
#[derive(Clone)]
pub struct RankingEngine {
    store: Arc<dyn OrderedScoreStore>,
}

impl RankingEngine {
    pub fn new(store: Arc<dyn OrderedScoreStore>) -> Self {
        Self { store }
    }

    /// Returns the 1-based rank of `display_key`, or `None` if it has no score.
    pub async fn rank_of(&self, display_key: &str) -> Result<Option<u64>> {
        Ok(self.store.rev_rank(display_key).await?.map(|rank| rank + 1))
    }

    /// Returns the first `min(n, cardinality)` entries with ranks `1..=len`.
    pub async fn top(&self, n: u64) -> Result<Vec<RankedEntry>> {
        if n == 0 {
            return Ok(Vec::new());
        }

        let entries = self.store.rev_range(0, n - 1).await?;
        Ok(entries
            .into_iter()
            .zip(1u64..)
            .map(|(entry, rank)| RankedEntry {
                display_key: entry.display_key,
                score: entry.score,
                rank,
            })
            .collect())
    }

    /// Returns up to `radius` entries on each side of `display_key`, plus the
    /// entry itself, in rank order.
    ///
    /// The window is clamped at both ends of the ranking: it never wraps and
    /// never pads. An absent key yields an empty window.
    pub async fn window_around(
        &self,
        display_key: &str,
        radius: u64,
    ) -> Result<Vec<NeighborEntry>> {
        let Some(position) = self.store.rev_rank(display_key).await? else {
            return Ok(Vec::new());
        };

        let start = position.saturating_sub(radius);
        let stop = position.saturating_add(radius);
        let entries = self.store.rev_range(start, stop).await?;

        tracing::debug!(
            "[RankingEngine] window around '{}' (rank {}): offsets {}..={}, {} entries",
            display_key,
            position + 1,
            start,
            stop,
            entries.len()
        );

        Ok(entries
            .into_iter()
            .zip(start + 1..)
            .map(|(entry, rank)| NeighborEntry {
                is_target: entry.display_key == display_key,
                display_key: entry.display_key,
                score: entry.score,
                rank,
            })
            .collect())
    }
}
