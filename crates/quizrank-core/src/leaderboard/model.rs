//! Leaderboard domain models.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Points held by a leaderboard entry. Upserts replace, they never add.
pub type Score = i64;

/// Payload field the fallback profile carries the display key under.
///
/// The display key is the user's email, so the fallback profile matches the
/// shape clients already receive for a real profile.
pub const FALLBACK_PROFILE_FIELD: &str = "email";

/// A row of the ranking as returned by the ordered-set store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub display_key: String,
    pub score: Score,
}

impl ScoreEntry {
    pub fn new(display_key: impl Into<String>, score: Score) -> Self {
        Self {
            display_key: display_key.into(),
            score,
        }
    }
}

/// An entry with its 1-based rank attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub display_key: String,
    pub score: Score,
    pub rank: u64,
}

/// An entry of a neighbourhood window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborEntry {
    pub display_key: String,
    pub score: Score,
    pub rank: u64,
    /// True for the entry the window was centred on
    pub is_target: bool,
}

/// Opaque metadata attached to a display key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub display_key: String,
    pub payload: Map<String, Value>,
}

impl UserProfile {
    pub fn new(display_key: impl Into<String>, payload: Map<String, Value>) -> Self {
        Self {
            display_key: display_key.into(),
            payload,
        }
    }

    /// Minimal profile used when nothing (or nothing readable) is stored.
    pub fn fallback(display_key: impl Into<String>) -> Self {
        let display_key = display_key.into();
        let mut payload = Map::new();
        payload.insert(
            FALLBACK_PROFILE_FIELD.to_string(),
            Value::String(display_key.clone()),
        );
        Self {
            display_key,
            payload,
        }
    }
}

/// A top-N entry joined with its profile. The profile is never absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfiledEntry {
    pub display_key: String,
    pub score: Score,
    pub rank: u64,
    pub profile: UserProfile,
}

impl ProfiledEntry {
    pub fn new(entry: RankedEntry, profile: UserProfile) -> Self {
        Self {
            display_key: entry.display_key,
            score: entry.score,
            rank: entry.rank,
            profile,
        }
    }
}

/// A window entry joined with its profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfiledNeighbor {
    pub display_key: String,
    pub score: Score,
    pub rank: u64,
    pub is_target: bool,
    pub profile: UserProfile,
}

impl ProfiledNeighbor {
    pub fn new(entry: NeighborEntry, profile: UserProfile) -> Self {
        Self {
            display_key: entry.display_key,
            score: entry.score,
            rank: entry.rank,
            is_target: entry.is_target,
            profile,
        }
    }
}

/// Outcome of looking up a user's standing.
///
/// `IdentityNotFound` and `NotRanked` are both "not found" to an end user but
/// mean different things: the first is an unknown user, the second a known
/// user without a score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScoreLookup {
    IdentityNotFound,
    NotRanked { display_key: String },
    Ranked {
        display_key: String,
        score: Score,
        rank: u64,
    },
}

impl ScoreLookup {
    pub fn score(&self) -> Option<Score> {
        match self {
            Self::Ranked { score, .. } => Some(*score),
            _ => None,
        }
    }

    pub fn rank(&self) -> Option<u64> {
        match self {
            Self::Ranked { rank, .. } => Some(*rank),
            _ => None,
        }
    }
}

/// Top-N view with totals and the caller's own standing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardOverview {
    pub entries: Vec<ProfiledEntry>,
    pub total_users: u64,
    pub current_user_rank: Option<u64>,
    pub current_user_score: Option<Score>,
}
