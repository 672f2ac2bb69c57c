//! Embedded keyed blob store.

use async_trait::async_trait;
use quizrank_core::error::Result;
use quizrank_core::leaderboard::KeyedBlobStore;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-process `KeyedBlobStore`, the counterpart of a Redis hash.
#[derive(Default)]
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<String, String>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyedBlobStore for InMemoryBlobStore {
    async fn put(&self, field: &str, value: String) -> Result<()> {
        self.blobs.write().await.insert(field.to_string(), value);
        Ok(())
    }

    async fn get(&self, field: &str) -> Result<Option<String>> {
        Ok(self.blobs.read().await.get(field).cloned())
    }

    async fn remove(&self, field: &str) -> Result<bool> {
        Ok(self.blobs.write().await.remove(field).is_some())
    }

    async fn clear(&self) -> Result<()> {
        self.blobs.write().await.clear();
        Ok(())
    }
}
