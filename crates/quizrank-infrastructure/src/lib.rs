pub mod config_service;
pub mod identity;
pub mod memory_blob_store;
pub mod memory_score_store;
pub mod redis_store;

pub use crate::config_service::ConfigService;
pub use crate::identity::{HttpIdentityResolver, StaticIdentityResolver};
pub use crate::memory_blob_store::InMemoryBlobStore;
pub use crate::memory_score_store::InMemoryScoreStore;
pub use crate::redis_store::{RedisBlobStore, RedisScoreStore};
