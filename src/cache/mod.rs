//! Classification cache abstraction.
//!
//! Values are JSON-serialised classification results; keys carry the
//! `llm:cls:` prefix. SET and EXPIRE are separate operations so a TTL
//! failure never invalidates an already-written value.

pub mod redis;

use async_trait::async_trait;
use thiserror::Error;

pub use self::redis::RedisCache;

/// Errors from the cache backend.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache connection failed: {0}")]
    Connection(String),

    #[error("cache operation failed: {0}")]
    Operation(String),
}

/// Key/value cache with per-key TTL.
#[async_trait]
pub trait ClassificationCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), CacheError>;

    async fn expire(&self, key: &str, ttl_secs: u64) -> Result<(), CacheError>;
}
