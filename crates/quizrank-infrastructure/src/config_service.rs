//! Configuration loading.
//!
//! Priority (highest last wins):
//! 1. Built-in defaults
//! 2. TOML config file (optional)
//! 3. Environment variables (`QUIZRANK_*`)
//!
//! Command-line flags are applied on top by the binary.

use quizrank_core::LeaderboardError;
use quizrank_core::config::LeaderboardConfig;
use quizrank_core::error::Result;
use std::env;
use std::path::Path;

pub const ENV_BACKEND: &str = "QUIZRANK_BACKEND";
pub const ENV_REDIS_URL: &str = "QUIZRANK_REDIS_URL";
pub const ENV_IDENTITY_URL: &str = "QUIZRANK_IDENTITY_URL";
pub const ENV_IDENTITY_TIMEOUT_SECS: &str = "QUIZRANK_IDENTITY_TIMEOUT_SECS";
pub const ENV_BIND: &str = "QUIZRANK_BIND";
pub const ENV_LOG_LEVEL: &str = "QUIZRANK_LOG_LEVEL";

pub struct ConfigService;

impl ConfigService {
    /// Loads the configuration from `path` (if given) and the process environment.
    pub async fn load(path: Option<&Path>) -> Result<LeaderboardConfig> {
        let config = match path {
            Some(path) => Self::load_file(path).await?,
            None => LeaderboardConfig::default(),
        };

        let config = Self::apply_overrides(config, |key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file. A missing file is an error: a path was
    /// asked for explicitly.
    pub async fn load_file(path: &Path) -> Result<LeaderboardConfig> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            LeaderboardError::config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config = LeaderboardConfig::from_toml_str(&content)?;
        tracing::info!("[Config] Loaded {}", path.display());
        Ok(config)
    }

    /// Applies `QUIZRANK_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(mut config: LeaderboardConfig, lookup: F) -> Result<LeaderboardConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(backend) = lookup(ENV_BACKEND) {
            config.backend = backend.parse()?;
        }
        if let Some(url) = lookup(ENV_REDIS_URL) {
            config.redis.url = url;
        }
        if let Some(url) = lookup(ENV_IDENTITY_URL) {
            config.identity.base_url = url;
        }
        if let Some(timeout) = lookup(ENV_IDENTITY_TIMEOUT_SECS) {
            config.identity.timeout_secs = timeout.trim().parse().map_err(|e| {
                LeaderboardError::config(format!(
                    "Invalid {} value '{}': {}",
                    ENV_IDENTITY_TIMEOUT_SECS, timeout, e
                ))
            })?;
        }
        if let Some(bind) = lookup(ENV_BIND) {
            config.server.bind = bind;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            config.logging.level = level;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizrank_core::config::BackendKind;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[tokio::test]
    async fn test_load_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("quizrank.toml");
        tokio::fs::write(
            &path,
            "backend = \"memory\"\n[server]\nbind = \"127.0.0.1:9000\"\n",
        )
        .await
        .unwrap();

        let config = ConfigService::load_file(&path).await.unwrap();

        assert_eq!(config.backend, BackendKind::Memory);
        assert_eq!(config.server.bind, "127.0.0.1:9000");
    }

    #[tokio::test]
    async fn test_missing_file_is_config_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = ConfigService::load_file(&dir.path().join("absent.toml"))
            .await
            .unwrap_err();
        assert!(err.is_config());
    }

    #[tokio::test]
    async fn test_malformed_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        tokio::fs::write(&path, "backend = [").await.unwrap();

        let err = ConfigService::load_file(&path).await.unwrap_err();
        assert!(matches!(err, LeaderboardError::Serialization { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let config = ConfigService::apply_overrides(
            LeaderboardConfig::default(),
            lookup_from(&[
                (ENV_BACKEND, "memory"),
                (ENV_REDIS_URL, "redis://localhost:6380"),
                (ENV_IDENTITY_TIMEOUT_SECS, " 3 "),
                (ENV_LOG_LEVEL, "debug"),
            ]),
        )
        .unwrap();

        assert_eq!(config.backend, BackendKind::Memory);
        assert_eq!(config.redis.url, "redis://localhost:6380");
        assert_eq!(config.identity.timeout_secs, 3);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_invalid_env_override() {
        let err = ConfigService::apply_overrides(
            LeaderboardConfig::default(),
            lookup_from(&[(ENV_IDENTITY_TIMEOUT_SECS, "soon")]),
        )
        .unwrap_err();
        assert!(err.is_config());
    }
}
