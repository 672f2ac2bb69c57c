use async_trait::async_trait;
use quizrank_application::LeaderboardUseCase;
use quizrank_core::LeaderboardError;
use quizrank_core::error::Result;
use quizrank_core::leaderboard::{
    FALLBACK_PROFILE_FIELD, KeyedBlobStore, MAX_EXACT_SCORE, OrderedScoreStore, Score, ScoreEntry,
    ScoreLookup,
};
use quizrank_infrastructure::{InMemoryBlobStore, InMemoryScoreStore, StaticIdentityResolver};
use serde_json::{Map, Value, json};
use std::sync::Arc;

struct Fixture {
    usecase: LeaderboardUseCase,
    scores: Arc<InMemoryScoreStore>,
    blobs: Arc<InMemoryBlobStore>,
}

fn fixture() -> Fixture {
    let resolver = StaticIdentityResolver::default()
        .with_user("u-alice", "alice")
        .with_user("u-bob", "bob")
        .with_user("u-carol", "carol")
        .with_user("u-dave", "dave")
        .with_user("u-eve", "eve");
    let scores = Arc::new(InMemoryScoreStore::new());
    let blobs = Arc::new(InMemoryBlobStore::new());

    Fixture {
        usecase: LeaderboardUseCase::new(Arc::new(resolver), scores.clone(), blobs.clone()),
        scores,
        blobs,
    }
}

fn profile(value: Value) -> Option<Map<String, Value>> {
    value.as_object().cloned()
}

#[tokio::test]
async fn test_submit_then_lookup_returns_submitted_score() {
    let f = fixture();

    f.usecase.submit_score("u-alice", 70, None).await.unwrap();
    f.usecase.submit_score("u-alice", 55, None).await.unwrap();

    let lookup = f.usecase.get_score_and_rank("u-alice").await.unwrap();
    assert_eq!(
        lookup,
        ScoreLookup::Ranked {
            display_key: "alice".to_string(),
            score: 55,
            rank: 1,
        }
    );
    assert_eq!(f.usecase.total_users().await.unwrap(), 1);
}

#[tokio::test]
async fn test_submit_unresolved_identity_writes_nothing() {
    let f = fixture();

    let err = f
        .usecase
        .submit_score("u-ghost", 10, profile(json!({ "name": "Ghost" })))
        .await
        .unwrap_err();

    assert!(err.is_identity_unresolved());
    assert_eq!(f.scores.cardinality().await.unwrap(), 0);
}

#[tokio::test]
async fn test_tie_scenario() {
    let f = fixture();
    f.usecase.submit_score("u-alice", 100, None).await.unwrap();
    f.usecase.submit_score("u-bob", 90, None).await.unwrap();
    f.usecase.submit_score("u-carol", 90, None).await.unwrap();

    let top = f.usecase.get_top(3).await.unwrap();

    assert_eq!(top.len(), 3);
    assert_eq!((top[0].display_key.as_str(), top[0].score, top[0].rank), ("alice", 100, 1));
    // Equal scores: descending display key
    assert_eq!((top[1].display_key.as_str(), top[1].score, top[1].rank), ("carol", 90, 2));
    assert_eq!((top[2].display_key.as_str(), top[2].score, top[2].rank), ("bob", 90, 3));
}

#[tokio::test]
async fn test_top_is_descending_and_contiguous() {
    let f = fixture();
    for (user, score) in [("u-alice", 5), ("u-bob", 50), ("u-carol", 20), ("u-dave", 35)] {
        f.usecase.submit_score(user, score, None).await.unwrap();
    }

    let top = f.usecase.get_top(10).await.unwrap();

    assert_eq!(top.len(), 4);
    assert!(top.windows(2).all(|pair| pair[0].score >= pair[1].score));
    let ranks: Vec<u64> = top.iter().map(|e| e.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn test_top_attaches_profiles_and_fallbacks() {
    let f = fixture();
    f.usecase
        .submit_score("u-alice", 10, profile(json!({ "email": "alice", "name": "Alice" })))
        .await
        .unwrap();
    f.usecase.submit_score("u-bob", 5, None).await.unwrap();

    let top = f.usecase.get_top(2).await.unwrap();

    assert_eq!(top[0].profile.payload["name"], "Alice");
    assert_eq!(top[1].profile.display_key, "bob");
    assert_eq!(top[1].profile.payload[FALLBACK_PROFILE_FIELD], "bob");
}

#[tokio::test]
async fn test_corrupted_profile_does_not_fail_top() {
    let f = fixture();
    f.usecase.submit_score("u-eve", 42, None).await.unwrap();
    f.blobs.put("eve", "\u{0}garbage".to_string()).await.unwrap();

    let top = f.usecase.get_top(5).await.unwrap();

    assert_eq!(top.len(), 1);
    assert_eq!(top[0].profile.display_key, "eve");
    assert_eq!(top[0].profile.payload[FALLBACK_PROFILE_FIELD], "eve");
}

#[tokio::test]
async fn test_empty_leaderboard() {
    let f = fixture();

    assert!(f.usecase.get_top(5).await.unwrap().is_empty());
    assert_eq!(
        f.usecase.get_score_and_rank("u-dave").await.unwrap(),
        ScoreLookup::NotRanked {
            display_key: "dave".to_string()
        }
    );
}

#[tokio::test]
async fn test_lookup_unknown_identity() {
    let f = fixture();
    f.usecase.submit_score("u-alice", 1, None).await.unwrap();

    assert_eq!(
        f.usecase.get_score_and_rank("u-ghost").await.unwrap(),
        ScoreLookup::IdentityNotFound
    );
}

#[tokio::test]
async fn test_neighbors_window() {
    let f = fixture();
    for (user, score) in [
        ("u-alice", 50),
        ("u-bob", 40),
        ("u-carol", 30),
        ("u-dave", 20),
        ("u-eve", 10),
    ] {
        f.usecase.submit_score(user, score, None).await.unwrap();
    }

    let window = f.usecase.get_neighbors("u-carol", 1).await.unwrap().unwrap();
    let keys: Vec<_> = window.iter().map(|e| e.display_key.as_str()).collect();
    assert_eq!(keys, vec!["bob", "carol", "dave"]);
    assert!(window[1].is_target);
    assert_eq!(window[1].rank, 3);
    assert_eq!(window[0].profile.display_key, "bob");

    let edge = f.usecase.get_neighbors("u-alice", 2).await.unwrap().unwrap();
    assert_eq!(edge.len(), 3);
    assert!(edge[0].is_target);

    let huge = f.usecase.get_neighbors("u-eve", 100).await.unwrap().unwrap();
    assert_eq!(huge.len(), 5);
    assert!(huge.last().unwrap().is_target);
}

#[tokio::test]
async fn test_neighbors_unresolved_and_unranked() {
    let f = fixture();
    f.usecase.submit_score("u-alice", 1, None).await.unwrap();

    assert_eq!(f.usecase.get_neighbors("u-ghost", 2).await.unwrap(), None);
    assert_eq!(
        f.usecase.get_neighbors("u-bob", 2).await.unwrap(),
        Some(Vec::new())
    );
}

#[tokio::test]
async fn test_remove_user() {
    let f = fixture();
    f.usecase
        .submit_score("u-alice", 10, profile(json!({ "name": "Alice" })))
        .await
        .unwrap();

    assert!(f.usecase.remove_user("u-alice").await.unwrap());

    // Identity still resolves, but the user is no longer ranked
    assert_eq!(
        f.usecase.get_score_and_rank("u-alice").await.unwrap(),
        ScoreLookup::NotRanked {
            display_key: "alice".to_string()
        }
    );
    assert_eq!(f.blobs.get("alice").await.unwrap(), None);

    assert!(!f.usecase.remove_user("u-alice").await.unwrap());
    assert!(!f.usecase.remove_user("u-ghost").await.unwrap());
}

#[tokio::test]
async fn test_clear_leaderboard() {
    let f = fixture();
    f.usecase
        .submit_score("u-alice", 10, profile(json!({ "name": "Alice" })))
        .await
        .unwrap();
    f.usecase.submit_score("u-bob", 20, None).await.unwrap();

    f.usecase.clear_leaderboard().await.unwrap();

    assert!(f.usecase.get_top(10).await.unwrap().is_empty());
    assert_eq!(f.usecase.total_users().await.unwrap(), 0);
    assert_eq!(f.blobs.get("alice").await.unwrap(), None);
}

#[tokio::test]
async fn test_overview() {
    let f = fixture();
    f.usecase.submit_score("u-alice", 30, None).await.unwrap();
    f.usecase.submit_score("u-bob", 20, None).await.unwrap();
    f.usecase.submit_score("u-carol", 10, None).await.unwrap();

    let overview = f.usecase.get_overview(2, Some("u-carol")).await.unwrap();
    assert_eq!(overview.entries.len(), 2);
    assert_eq!(overview.total_users, 3);
    assert_eq!(overview.current_user_rank, Some(3));
    assert_eq!(overview.current_user_score, Some(10));

    let anonymous = f.usecase.get_overview(2, None).await.unwrap();
    assert_eq!(anonymous.current_user_rank, None);
    assert_eq!(anonymous.current_user_score, None);
}

// Stores that always fail, to force the backend-failure path

struct DownScoreStore;

#[async_trait]
impl OrderedScoreStore for DownScoreStore {
    async fn upsert(&self, _: &str, _: Score) -> Result<()> {
        Err(LeaderboardError::backend("connection refused"))
    }
    async fn score(&self, _: &str) -> Result<Option<Score>> {
        Err(LeaderboardError::backend("connection refused"))
    }
    async fn remove(&self, _: &str) -> Result<bool> {
        Err(LeaderboardError::backend("connection refused"))
    }
    async fn cardinality(&self) -> Result<u64> {
        Err(LeaderboardError::backend("connection refused"))
    }
    async fn clear(&self) -> Result<()> {
        Err(LeaderboardError::backend("connection refused"))
    }
    async fn rev_rank(&self, _: &str) -> Result<Option<u64>> {
        Err(LeaderboardError::backend("connection refused"))
    }
    async fn rev_range(&self, _: u64, _: u64) -> Result<Vec<ScoreEntry>> {
        Err(LeaderboardError::backend("connection refused"))
    }
}

struct DownBlobStore;

#[async_trait]
impl KeyedBlobStore for DownBlobStore {
    async fn put(&self, _: &str, _: String) -> Result<()> {
        Err(LeaderboardError::backend("connection refused"))
    }
    async fn get(&self, _: &str) -> Result<Option<String>> {
        Err(LeaderboardError::backend("connection refused"))
    }
    async fn remove(&self, _: &str) -> Result<bool> {
        Err(LeaderboardError::backend("connection refused"))
    }
    async fn clear(&self) -> Result<()> {
        Err(LeaderboardError::backend("connection refused"))
    }
}

fn down_usecase() -> LeaderboardUseCase {
    let resolver = StaticIdentityResolver::default().with_user("u-alice", "alice");
    LeaderboardUseCase::new(
        Arc::new(resolver),
        Arc::new(DownScoreStore),
        Arc::new(DownBlobStore),
    )
}

#[tokio::test]
async fn test_backend_failure_is_not_reported_as_not_found() {
    let usecase = down_usecase();

    assert!(usecase.submit_score("u-alice", 1, None).await.unwrap_err().is_backend());
    assert!(usecase.get_top(3).await.unwrap_err().is_backend());
    assert!(usecase.get_score_and_rank("u-alice").await.unwrap_err().is_backend());
    assert!(usecase.get_neighbors("u-alice", 1).await.unwrap_err().is_backend());
    assert!(usecase.remove_user("u-alice").await.unwrap_err().is_backend());
    assert!(usecase.clear_leaderboard().await.unwrap_err().is_backend());
}

#[tokio::test]
async fn test_unresolved_identity_short_circuits_before_backend() {
    let usecase = down_usecase();

    // The store is down, but resolution fails first
    assert!(
        usecase
            .submit_score("u-ghost", 1, None)
            .await
            .unwrap_err()
            .is_identity_unresolved()
    );
    assert_eq!(
        usecase.get_score_and_rank("u-ghost").await.unwrap(),
        ScoreLookup::IdentityNotFound
    );
    assert_eq!(usecase.get_neighbors("u-ghost", 1).await.unwrap(), None);
    assert!(!usecase.remove_user("u-ghost").await.unwrap());
}

#[tokio::test]
async fn test_profile_store_failure_surfaces() {
    let resolver = StaticIdentityResolver::default().with_user("u-alice", "alice");
    let usecase = LeaderboardUseCase::new(
        Arc::new(resolver),
        Arc::new(InMemoryScoreStore::new()),
        Arc::new(DownBlobStore),
    );
    usecase.submit_score("u-alice", 3, None).await.unwrap();

    assert!(usecase.get_top(1).await.unwrap_err().is_backend());
}

#[tokio::test]
async fn test_submit_rejects_score_beyond_exact_range() {
    let f = fixture();

    let err = f
        .usecase
        .submit_score("u-alice", MAX_EXACT_SCORE + 1, profile(json!({ "name": "A" })))
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(f.scores.cardinality().await.unwrap(), 0);
    assert_eq!(f.blobs.get("alice").await.unwrap(), None);

    f.usecase
        .submit_score("u-alice", -MAX_EXACT_SCORE, None)
        .await
        .unwrap();
    assert_eq!(
        f.usecase.get_score_and_rank("u-alice").await.unwrap().score(),
        Some(-MAX_EXACT_SCORE)
    );
}
