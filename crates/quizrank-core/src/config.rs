//! Leaderboard configuration model.
//!
//! Every section has defaults so an empty TOML file (or no file at all) yields
//! a usable configuration pointing at the docker-compose service names.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{LeaderboardError, Result};

pub const DEFAULT_REDIS_URL: &str = "redis://redis:6379";
pub const DEFAULT_LEADERBOARD_KEY: &str = "quiz_leaderboard";
pub const DEFAULT_PROFILE_KEY: &str = "user_data";
pub const DEFAULT_IDENTITY_URL: &str = "http://auth-service:8000";
pub const DEFAULT_BIND: &str = "0.0.0.0:8000";

/// Which backend holds the ordered set and the profile hash.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Redis,
    Memory,
}

impl std::str::FromStr for BackendKind {
    type Err = LeaderboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" => Ok(Self::Memory),
            other => Err(LeaderboardError::config(format!(
                "unknown backend '{}', expected 'redis' or 'memory'",
                other
            ))),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct LeaderboardConfig {
    #[serde(default)]
    pub backend: BackendKind,
    #[serde(default)]
    pub redis: RedisSettings,
    #[serde(default)]
    pub identity: IdentitySettings,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RedisSettings {
    #[serde(default = "default_redis_url")]
    pub url: String,
    /// Sorted-set key holding display key -> score
    #[serde(default = "default_leaderboard_key")]
    pub leaderboard_key: String,
    /// Hash key holding display key -> profile JSON
    #[serde(default = "default_profile_key")]
    pub profile_key: String,
    #[serde(default = "default_connection_retries")]
    pub connection_retries: usize,
    #[serde(default = "default_connection_timeout_ms")]
    pub connection_timeout_ms: u64,
}

impl Default for RedisSettings {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            leaderboard_key: default_leaderboard_key(),
            profile_key: default_profile_key(),
            connection_retries: default_connection_retries(),
            connection_timeout_ms: default_connection_timeout_ms(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct IdentitySettings {
    #[serde(default = "default_identity_url")]
    pub base_url: String,
    #[serde(default = "default_identity_timeout_secs")]
    pub timeout_secs: u64,
    /// Fixed user id -> email mapping. When non-empty the static resolver is
    /// used instead of the identity service.
    #[serde(default)]
    pub static_users: HashMap<String, String>,
}

impl Default for IdentitySettings {
    fn default() -> Self {
        Self {
            base_url: default_identity_url(),
            timeout_secs: default_identity_timeout_secs(),
            static_users: HashMap::new(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl LeaderboardConfig {
    /// Parses a TOML document, filling missing sections with defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.redis.leaderboard_key == self.redis.profile_key {
            return Err(LeaderboardError::config(
                "redis.leaderboard_key and redis.profile_key must differ",
            ));
        }
        if self.identity.timeout_secs == 0 {
            return Err(LeaderboardError::config(
                "identity.timeout_secs must be greater than zero",
            ));
        }
        Ok(())
    }
}

fn default_redis_url() -> String {
    DEFAULT_REDIS_URL.to_string()
}

fn default_leaderboard_key() -> String {
    DEFAULT_LEADERBOARD_KEY.to_string()
}

fn default_profile_key() -> String {
    DEFAULT_PROFILE_KEY.to_string()
}

fn default_connection_retries() -> usize {
    1
}

fn default_connection_timeout_ms() -> u64 {
    500
}

fn default_identity_url() -> String {
    DEFAULT_IDENTITY_URL.to_string()
}

fn default_identity_timeout_secs() -> u64 {
    5
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
