//! Single-slot session storage: `user id -> current token`.
//!
//! A login overwrites the slot, so only the most recently issued token for a
//! user passes the [`gate`](crate::gate). Logout clears it.
//!
//! | Store | Use |
//! |-------|-----|
//! | [`InMemorySessionStore`] | tests and single-process development |
//! | [`RedisSessionStore`] | production (`redis_store` feature) |

mod memory;
#[cfg(feature = "redis_store")]
mod redis;

use async_trait::async_trait;
use chrono::Duration;

use crate::BlogError;

pub use memory::InMemorySessionStore;
#[cfg(feature = "redis_store")]
pub use self::redis::RedisSessionStore;

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Stores `token` as the user's current session, replacing any previous one.
    async fn put(&self, user_id: i64, token: &str, ttl: Duration) -> Result<(), BlogError>;

    /// Returns the current token, `None` when the user has no live session.
    async fn get(&self, user_id: i64) -> Result<Option<String>, BlogError>;

    /// Removes the session. Removing a missing session succeeds.
    async fn delete(&self, user_id: i64) -> Result<(), BlogError>;
}
