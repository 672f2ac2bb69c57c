//! Leaderboard use case implementation.
//!
//! This module provides the `LeaderboardUseCase`, the public operation surface
//! of the leaderboard. It composes identity resolution, the score store, the
//! ranking engine and profile attachment into the operations request handlers
//! call.

use futures::future::try_join_all;
use quizrank_core::LeaderboardError;
use quizrank_core::error::Result;
use quizrank_core::identity::IdentityResolver;
use quizrank_core::leaderboard::{
    KeyedBlobStore, LeaderboardOverview, OrderedScoreStore, ProfileAttachment, ProfiledEntry,
    ProfiledNeighbor, RankingEngine, Score, ScoreLookup, ensure_exact_score,
};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Use case for reading and updating the leaderboard.
///
/// # Responsibilities
///
/// - Resolving caller-facing user ids into display keys on every call
/// - Writing scores and profiles
/// - Composing ranked views with profiles attached
///
/// # Consistency
///
/// No lock is held across round trips. "Resolve identity" and "upsert score"
/// are separate transactions, and concurrent submissions for the same user
/// resolve as last-write-wins.
#[derive(Clone)]
pub struct LeaderboardUseCase {
    /// Maps user ids to display keys
    identity_resolver: Arc<dyn IdentityResolver>,
    /// Sorted set of display key -> score
    score_store: Arc<dyn OrderedScoreStore>,
    /// Rank queries over `score_store`
    ranking: RankingEngine,
    /// Profiles joined onto results
    profiles: ProfileAttachment,
}

impl LeaderboardUseCase {
    /// Creates a new `LeaderboardUseCase`.
    ///
    /// # Arguments
    ///
    /// * `identity_resolver` - Resolver used for every user-addressed operation
    /// * `score_store` - Ordered set backing scores and ranks
    /// * `profile_store` - Hash backing the profile blobs
    pub fn new(
        identity_resolver: Arc<dyn IdentityResolver>,
        score_store: Arc<dyn OrderedScoreStore>,
        profile_store: Arc<dyn KeyedBlobStore>,
    ) -> Self {
        Self {
            identity_resolver,
            ranking: RankingEngine::new(score_store.clone()),
            score_store,
            profiles: ProfileAttachment::new(profile_store),
        }
    }

    /// Records `score` for the user, replacing any previous score.
    ///
    /// When `profile` is supplied it overwrites the stored profile.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Score (and profile) written
    /// - `Err(Validation)`: The score is outside `+/-MAX_EXACT_SCORE`; nothing was written
    /// - `Err(IdentityUnresolved)`: The user id could not be resolved; nothing was written
    /// - `Err(Backend)`: A store failed
    pub async fn submit_score(
        &self,
        user_id: &str,
        score: Score,
        profile: Option<Map<String, Value>>,
    ) -> Result<()> {
        ensure_exact_score(score)?;

        let Some(display_key) = self.identity_resolver.resolve(user_id).await else {
            tracing::warn!(
                "[Leaderboard] Rejecting score for user {}: identity unresolved",
                user_id
            );
            return Err(LeaderboardError::identity_unresolved(user_id));
        };

        self.score_store.upsert(&display_key, score).await?;

        if let Some(payload) = profile {
            self.profiles.put(&display_key, &payload).await?;
        }

        tracing::info!(
            "[Leaderboard] Score {} recorded for '{}'",
            score,
            display_key
        );
        Ok(())
    }

    /// Returns the top `n` entries, each with a profile attached.
    ///
    /// Entries without a stored (or readable) profile get the fallback profile.
    pub async fn get_top(&self, n: u64) -> Result<Vec<ProfiledEntry>> {
        let entries = self.ranking.top(n).await?;

        try_join_all(entries.into_iter().map(|entry| async move {
            let profile = self.profiles.get_or_fallback(&entry.display_key).await?;
            Ok::<_, LeaderboardError>(ProfiledEntry::new(entry, profile))
        }))
        .await
    }

    /// Looks up the user's score and rank.
    ///
    /// "Unknown user" and "known user without a score" are reported as
    /// different [`ScoreLookup`] variants, never as errors.
    pub async fn get_score_and_rank(&self, user_id: &str) -> Result<ScoreLookup> {
        let Some(display_key) = self.identity_resolver.resolve(user_id).await else {
            return Ok(ScoreLookup::IdentityNotFound);
        };

        let Some(score) = self.score_store.score(&display_key).await? else {
            return Ok(ScoreLookup::NotRanked { display_key });
        };

        // The entry can disappear between the two round trips
        match self.ranking.rank_of(&display_key).await? {
            Some(rank) => Ok(ScoreLookup::Ranked {
                display_key,
                score,
                rank,
            }),
            None => Ok(ScoreLookup::NotRanked { display_key }),
        }
    }

    /// Returns the window of `radius` entries on each side of the user.
    ///
    /// # Returns
    ///
    /// - `Ok(None)`: Identity unresolved
    /// - `Ok(Some(vec![]))`: Known user without a score
    /// - `Ok(Some(window))`: The clamped window, target marked
    pub async fn get_neighbors(
        &self,
        user_id: &str,
        radius: u64,
    ) -> Result<Option<Vec<ProfiledNeighbor>>> {
        let Some(display_key) = self.identity_resolver.resolve(user_id).await else {
            return Ok(None);
        };

        let window = self.ranking.window_around(&display_key, radius).await?;

        let neighbors = try_join_all(window.into_iter().map(|entry| async move {
            let profile = self.profiles.get_or_fallback(&entry.display_key).await?;
            Ok::<_, LeaderboardError>(ProfiledNeighbor::new(entry, profile))
        }))
        .await?;

        Ok(Some(neighbors))
    }

    /// Removes the user's score and profile.
    ///
    /// Returns `false` when the identity is unresolved or nothing was stored.
    pub async fn remove_user(&self, user_id: &str) -> Result<bool> {
        let Some(display_key) = self.identity_resolver.resolve(user_id).await else {
            return Ok(false);
        };

        let removed_score = self.score_store.remove(&display_key).await?;
        let removed_profile = self.profiles.remove(&display_key).await?;

        if removed_score || removed_profile {
            tracing::info!("[Leaderboard] Removed '{}'", display_key);
        }
        Ok(removed_score || removed_profile)
    }

    /// Drops every score and every profile.
    ///
    /// No authorization is checked here; callers enforce it.
    pub async fn clear_leaderboard(&self) -> Result<()> {
        self.score_store.clear().await?;
        self.profiles.clear_all().await?;
        tracing::info!("[Leaderboard] Cleared");
        Ok(())
    }

    /// Number of ranked users.
    pub async fn total_users(&self) -> Result<u64> {
        self.score_store.cardinality().await
    }

    /// Top `n` entries plus totals and, when given, the caller's own standing.
    pub async fn get_overview(
        &self,
        n: u64,
        current_user_id: Option<&str>,
    ) -> Result<LeaderboardOverview> {
        let entries = self.get_top(n).await?;
        let total_users = self.total_users().await?;

        let standing = match current_user_id {
            Some(user_id) => self.get_score_and_rank(user_id).await?,
            None => ScoreLookup::IdentityNotFound,
        };

        Ok(LeaderboardOverview {
            entries,
            total_users,
            current_user_rank: standing.rank(),
            current_user_score: standing.score(),
        })
    }
}
