//! Fixed identity mapping for local runs and tests.

use async_trait::async_trait;
use quizrank_core::identity::IdentityResolver;
use std::collections::HashMap;

/// Resolves user ids from a map loaded once from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityResolver {
    users: HashMap<String, String>,
}

impl StaticIdentityResolver {
    pub fn new(users: HashMap<String, String>) -> Self {
        Self { users }
    }

    /// Adds or replaces a mapping.
    pub fn with_user(mut self, user_id: impl Into<String>, display_key: impl Into<String>) -> Self {
        self.users.insert(user_id.into(), display_key.into());
        self
    }
}

#[async_trait]
impl IdentityResolver for StaticIdentityResolver {
    async fn resolve(&self, user_id: &str) -> Option<String> {
        let resolved = self.users.get(user_id).cloned();
        if resolved.is_none() {
            tracing::debug!("[IdentityResolver] Unknown static user {}", user_id);
        }
        resolved
    }
}
