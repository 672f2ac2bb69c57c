//! Leaderboard domain module.
//!
//! This module contains the ranking models, the store capability traits and
//! the two query layers built on them.
//!
//! # Module Structure
//!
//! - `model`: Score entries, ranked views, profiles and lookup outcomes
//! - `store`: `OrderedScoreStore` and `KeyedBlobStore` traits
//! - `engine`: `RankingEngine` (rank, top-N, neighbourhood window)
//! - `profile`: `ProfileAttachment` (JSON profiles with fallback)
//!
//! # Usage
//!
//! ```ignore
//! use quizrank_core::leaderboard::{RankingEngine, ProfileAttachment};
//! use quizrank_core::leaderboard::{OrderedScoreStore, KeyedBlobStore};
//! ```

pub mod engine;
mod model;
pub mod profile;
pub mod store;

// Re-export public API
pub use engine::RankingEngine;
pub use model::{
    FALLBACK_PROFILE_FIELD, LeaderboardOverview, NeighborEntry, ProfiledEntry, ProfiledNeighbor,
    RankedEntry, Score, ScoreEntry, ScoreLookup, UserProfile,
};
pub use profile::ProfileAttachment;
pub use store::{KeyedBlobStore, MAX_EXACT_SCORE, OrderedScoreStore, ensure_exact_score};
