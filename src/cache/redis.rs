use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::Pool;
use deadpool_redis::redis::AsyncCommands;

use crate::BlogError;

use super::{Cache, CacheKey, CacheOp};

/// Redis cache. Values are stored as raw bytes with `SET EX`.
#[derive(Clone)]
pub struct RedisCache {
    pool: Pool,
}

impl RedisCache {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    async fn conn(&self, op: CacheOp) -> Result<deadpool_redis::Connection, BlogError> {
        self.pool.get().await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to get Redis connection");
            BlogError::Cache(op, e.to_string())
        })
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<Vec<u8>>, BlogError> {
        let mut conn = self.conn(CacheOp::Get).await?;
        conn.get::<_, Option<Vec<u8>>>(key.as_str())
            .await
            .map_err(|e| {
                tracing::warn!(key = %key, error = %e, "Redis GET error");
                BlogError::Cache(CacheOp::Get, e.to_string())
            })
    }

    async fn set(&self, key: &CacheKey, value: &[u8], ttl: Duration) -> Result<(), BlogError> {
        let mut conn = self.conn(CacheOp::Set).await?;
        // SET EX rejects a zero expiry; configured TTLs are at least a second.
        let seconds = ttl.as_secs().max(1);
        conn.set_ex::<_, _, ()>(key.as_str(), value, seconds)
            .await
            .map_err(|e| {
                tracing::warn!(key = %key, error = %e, "Redis SET error");
                BlogError::Cache(CacheOp::Set, e.to_string())
            })
    }

    async fn delete(&self, key: &CacheKey) -> Result<(), BlogError> {
        let mut conn = self.conn(CacheOp::Delete).await?;
        // DEL on a missing key returns 0, not an error.
        conn.del::<_, ()>(key.as_str()).await.map_err(|e| {
            tracing::warn!(key = %key, error = %e, "Redis DEL error");
            BlogError::Cache(CacheOp::Delete, e.to_string())
        })
    }
}
