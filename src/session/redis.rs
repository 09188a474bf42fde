use async_trait::async_trait;
use chrono::Duration;
use deadpool_redis::Pool;
use deadpool_redis::redis::AsyncCommands;

use crate::BlogError;

use super::SessionStore;

/// Redis-backed sessions. The key is the decimal user id and the value the
/// raw token, written with `SET EX`.
#[derive(Clone)]
pub struct RedisSessionStore {
    pool: Pool,
}

impl RedisSessionStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    async fn conn(&self) -> Result<deadpool_redis::Connection, BlogError> {
        self.pool.get().await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to get Redis connection");
            BlogError::SessionUnavailable(e.to_string())
        })
    }
}

fn store_error(e: deadpool_redis::redis::RedisError) -> BlogError {
    BlogError::SessionUnavailable(e.to_string())
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn put(&self, user_id: i64, token: &str, ttl: Duration) -> Result<(), BlogError> {
        let seconds = u64::try_from(ttl.num_seconds())
            .ok()
            .filter(|s| *s > 0)
            .ok_or_else(|| BlogError::Configuration("session ttl must be positive".to_owned()))?;

        let mut conn = self.conn().await?;
        conn.set_ex::<_, _, ()>(user_id.to_string(), token, seconds)
            .await
            .map_err(store_error)
    }

    async fn get(&self, user_id: i64) -> Result<Option<String>, BlogError> {
        let mut conn = self.conn().await?;
        conn.get::<_, Option<String>>(user_id.to_string())
            .await
            .map_err(store_error)
    }

    async fn delete(&self, user_id: i64) -> Result<(), BlogError> {
        let mut conn = self.conn().await?;
        conn.del::<_, ()>(user_id.to_string())
            .await
            .map_err(store_error)
    }
}
