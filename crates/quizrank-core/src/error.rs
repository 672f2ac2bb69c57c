//! Error types for the leaderboard.

use thiserror::Error;

/// A shared error type for the leaderboard crates.
///
/// "Cannot resolve identity" and "backend unavailable" are deliberately
/// separate variants so callers can report them differently.
#[derive(Error, Debug, Clone)]
pub enum LeaderboardError {
    /// The identity service could not map a user id to a display key
    #[error("Identity unresolved for user '{user_id}'")]
    IdentityUnresolved { user_id: String },

    /// Ordered-set or hash store unreachable / command failed
    #[error("Backend error: {0}")]
    Backend(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input rejected before reaching a store
    #[error("Validation error: {0}")]
    Validation(String),
}

impl LeaderboardError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an IdentityUnresolved error
    pub fn identity_unresolved(user_id: impl Into<String>) -> Self {
        Self::IdentityUnresolved {
            user_id: user_id.into(),
        }
    }

    /// Creates a Backend error
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is an IdentityUnresolved error
    pub fn is_identity_unresolved(&self) -> bool {
        matches!(self, Self::IdentityUnresolved { .. })
    }

    /// Check if this is a Backend error
    pub fn is_backend(&self) -> bool {
        matches!(self, Self::Backend(_))
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for LeaderboardError {
    fn from(err: std::io::Error) -> Self {
        Self::Config(format!("{} (kind: {:?})", err, err.kind()))
    }
}

impl From<serde_json::Error> for LeaderboardError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for LeaderboardError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, LeaderboardError>`.
pub type Result<T> = std::result::Result<T, LeaderboardError>;
