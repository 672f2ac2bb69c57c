use std::sync::Arc;

use anyhow::Result;
use quizrank_application::LeaderboardUseCase;
use quizrank_core::config::{BackendKind, IdentitySettings, LeaderboardConfig};
use quizrank_core::identity::IdentityResolver;
use quizrank_core::leaderboard::{KeyedBlobStore, OrderedScoreStore};
use quizrank_infrastructure::{
    HttpIdentityResolver, InMemoryBlobStore, InMemoryScoreStore, RedisBlobStore, RedisScoreStore,
    StaticIdentityResolver, redis_store,
};

use crate::state::AppState;

/// Builds the identity resolver: the static map when one is configured,
/// the auth service otherwise.
pub fn build_identity_resolver(settings: &IdentitySettings) -> Result<Arc<dyn IdentityResolver>> {
    if !settings.static_users.is_empty() {
        tracing::info!(
            "[Bootstrap] Using static identity map ({} users)",
            settings.static_users.len()
        );
        return Ok(Arc::new(StaticIdentityResolver::new(
            settings.static_users.clone(),
        )));
    }

    tracing::info!("[Bootstrap] Using identity service at {}", settings.base_url);
    Ok(Arc::new(HttpIdentityResolver::from_settings(settings)?))
}

/// Builds the score and profile stores for the configured backend.
pub async fn build_stores(
    config: &LeaderboardConfig,
) -> Result<(Arc<dyn OrderedScoreStore>, Arc<dyn KeyedBlobStore>)> {
    match config.backend {
        BackendKind::Memory => {
            tracing::warn!("[Bootstrap] Using in-memory backend; data is lost on restart");
            Ok((
                Arc::new(InMemoryScoreStore::new()),
                Arc::new(InMemoryBlobStore::new()),
            ))
        }
        BackendKind::Redis => {
            let connection = redis_store::connect(&config.redis).await?;
            Ok((
                Arc::new(RedisScoreStore::new(
                    connection.clone(),
                    &config.redis.leaderboard_key,
                )),
                Arc::new(RedisBlobStore::new(connection, &config.redis.profile_key)),
            ))
        }
    }
}

pub async fn build_state(config: LeaderboardConfig) -> Result<Arc<AppState>> {
    let identity_resolver = build_identity_resolver(&config.identity)?;
    let (score_store, profile_store) = build_stores(&config).await?;

    let leaderboard = LeaderboardUseCase::new(identity_resolver, score_store, profile_store);

    Ok(Arc::new(AppState {
        config,
        leaderboard,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_backend_with_static_users() {
        let mut config = LeaderboardConfig::default();
        config.backend = BackendKind::Memory;
        config
            .identity
            .static_users
            .insert("1".to_string(), "alice@example.com".to_string());

        let state = build_state(config).await.unwrap();

        state.leaderboard.submit_score("1", 12, None).await.unwrap();
        assert_eq!(state.leaderboard.total_users().await.unwrap(), 1);
    }

    #[test]
    fn test_invalid_identity_url_fails_fast() {
        let settings = IdentitySettings {
            base_url: "::not a url::".to_string(),
            ..IdentitySettings::default()
        };
        assert!(build_identity_resolver(&settings).is_err());
    }
}
