//! Profile attachment.
//!
//! Profiles are stored as JSON blobs in a [`KeyedBlobStore`] and joined onto
//! ranking results. This store is auxiliary: a corrupted blob must never block
//! a ranking query, so unreadable payloads degrade to [`UserProfile::fallback`].

use serde_json::{Map, Value};
use std::sync::Arc;

use super::model::UserProfile;
use super::store::KeyedBlobStore;
use crate::error::Result;

#[derive(Clone)]
pub struct ProfileAttachment {
    store: Arc<dyn KeyedBlobStore>,
}

impl ProfileAttachment {
    pub fn new(store: Arc<dyn KeyedBlobStore>) -> Self {
        Self { store }
    }

    /// Overwrites the stored payload for `display_key`.
    pub async fn put(&self, display_key: &str, payload: &Map<String, Value>) -> Result<()> {
        let blob = serde_json::to_string(payload)?;
        self.store.put(display_key, blob).await
    }

    /// Returns the stored profile.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(profile))`: A blob is stored; if it is not a JSON object the
    ///   fallback profile is returned in its place
    /// - `Ok(None)`: Nothing stored for this key
    /// - `Err(_)`: The blob store itself failed
    pub async fn get(&self, display_key: &str) -> Result<Option<UserProfile>> {
        let Some(blob) = self.store.get(display_key).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<Map<String, Value>>(&blob) {
            Ok(payload) => Ok(Some(UserProfile::new(display_key, payload))),
            Err(e) => {
                tracing::warn!(
                    "[ProfileAttachment] Unreadable profile for '{}', using fallback: {}",
                    display_key,
                    e
                );
                Ok(Some(UserProfile::fallback(display_key)))
            }
        }
    }

    /// Like [`get`](Self::get), but a missing profile also yields the fallback.
    pub async fn get_or_fallback(&self, display_key: &str) -> Result<UserProfile> {
        Ok(self
            .get(display_key)
            .await?
            .unwrap_or_else(|| UserProfile::fallback(display_key)))
    }

    pub async fn remove(&self, display_key: &str) -> Result<bool> {
        self.store.remove(display_key).await
    }

    pub async fn clear_all(&self) -> Result<()> {
        self.store.clear().await
    }
}
