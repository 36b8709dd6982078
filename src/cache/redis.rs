//! Redis cache backend over a reconnecting connection manager.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use super::{CacheError, ClassificationCache};

/// Redis-backed classification cache.
///
/// `ConnectionManager` handles reconnection; clones share the underlying
/// multiplexed connection.
pub struct RedisCache {
    redis: ConnectionManager,
}

impl RedisCache {
    /// Connect to Redis at `url` (e.g. `redis://127.0.0.1:6379`).
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client =
            redis::Client::open(url).map_err(|e| CacheError::Connection(e.to_string()))?;
        let redis = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::Connection(e.to_string()))?;
        Ok(Self { redis })
    }
}

#[async_trait]
impl ClassificationCache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.redis.clone();
        conn.get(key)
            .await
            .map_err(|e| CacheError::Operation(e.to_string()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let mut conn = self.redis.clone();
        conn.set::<_, _, ()>(key, value)
            .await
            .map_err(|e| CacheError::Operation(e.to_string()))
    }

    async fn expire(&self, key: &str, ttl_secs: u64) -> Result<(), CacheError> {
        let mut conn = self.redis.clone();
        conn.expire::<_, ()>(key, ttl_secs as usize)
            .await
            .map_err(|e| CacheError::Operation(e.to_string()))
    }
}
