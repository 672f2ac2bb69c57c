//! HttpIdentityResolver - resolves user ids through the auth service REST API.
//!
//! `GET {base_url}/users/{user_id}` answers `{"email": "..."}` with status 200.
//! Every other outcome (non-200, transport error, timeout, unexpected body,
//! empty email) is logged and reported as "unresolved".

use async_trait::async_trait;
use quizrank_core::LeaderboardError;
use quizrank_core::config::IdentitySettings;
use quizrank_core::error::Result;
use quizrank_core::identity::IdentityResolver;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct IdentityResponse {
    email: Option<String>,
}

/// Identity resolver that talks to the auth service.
#[derive(Clone)]
pub struct HttpIdentityResolver {
    client: Client,
    base_url: Url,
}

impl HttpIdentityResolver {
    /// Creates a resolver with an explicit base URL and request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            LeaderboardError::config(format!("Invalid identity base URL '{}': {}", base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(LeaderboardError::config(format!(
                "Identity base URL '{}' cannot be a base",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LeaderboardError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    pub fn from_settings(settings: &IdentitySettings) -> Result<Self> {
        Self::new(&settings.base_url, Duration::from_secs(settings.timeout_secs))
    }

    /// Builds `{base_url}/users/{user_id}`, percent-encoding the id.
    fn user_url(&self, user_id: &str) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected in `new`
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("users").push(user_id);
        }
        url
    }

    async fn fetch_email(&self, user_id: &str) -> std::result::Result<Option<String>, String> {
        let url = self.user_url(user_id);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(format!("identity service answered {}", status));
        }

        let body: IdentityResponse = response
            .json()
            .await
            .map_err(|e| format!("failed to parse response: {}", e))?;

        Ok(body.email.filter(|email| !email.trim().is_empty()))
    }
}

#[async_trait]
impl IdentityResolver for HttpIdentityResolver {
    async fn resolve(&self, user_id: &str) -> Option<String> {
        match self.fetch_email(user_id).await {
            Ok(Some(email)) => Some(email),
            Ok(None) => {
                tracing::warn!("[IdentityResolver] No email for user {}", user_id);
                None
            }
            Err(reason) => {
                tracing::warn!(
                    "[IdentityResolver] Could not resolve user {}: {}",
                    user_id,
                    reason
                );
                None
            }
        }
    }
}
