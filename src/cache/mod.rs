//! Cache-aside reads and invalidation on write.
//!
//! Entries are JSON snapshots keyed by [`CacheKey`]: `"<kind>:<id>"` for a
//! single resource and a fixed literal (`articleList`, `categoryList`,
//! `userList`) for a listing. [`CachedRepository`] wraps a [`Repository`]
//! and a [`Cache`]:
//!
//! - reads try the cache first, fall back to the store on a clean miss and
//!   fill the cache with the configured TTL;
//! - writes go to the store first and only then remove the affected entries.
//!
//! Cache failures are never treated as misses. A read error, an undecodable
//! snapshot, a failed fill or a failed eviction all surface as
//! [`BlogError::Cache`] (tagged with the failed [`CacheOp`]) or
//! [`BlogError::Serialization`].
//!
//! [`Repository`]: crate::Repository

mod cached;
mod memory;
#[cfg(feature = "redis_store")]
mod redis;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::{BlogError, ResourceKind};

pub use cached::CachedRepository;
pub use memory::InMemoryCache;
#[cfg(feature = "redis_store")]
pub use self::redis::RedisCache;

/// Default lifetime of a cache entry.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Byte-oriented key/value cache with per-entry expiry.
#[async_trait]
pub trait Cache: Send + Sync {
    /// `Ok(None)` on a clean miss; `Err` only when the cache itself failed.
    async fn get(&self, key: &CacheKey) -> Result<Option<Vec<u8>>, BlogError>;

    async fn set(&self, key: &CacheKey, value: &[u8], ttl: Duration) -> Result<(), BlogError>;

    /// Removes the entry. A missing key is not an error.
    async fn delete(&self, key: &CacheKey) -> Result<(), BlogError>;
}

/// The cache call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheOp {
    Get,
    Set,
    Delete,
}

impl fmt::Display for CacheOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "get",
            Self::Set => "set",
            Self::Delete => "delete",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// `"<kind>:<id>"`, e.g. `article:7`.
    pub fn item(kind: ResourceKind, id: i64) -> Self {
        Self(format!("{kind}:{id}"))
    }

    pub fn list(kind: ResourceKind) -> Self {
        let key = match kind {
            ResourceKind::User => "userList",
            ResourceKind::Article => "articleList",
            ResourceKind::Category => "categoryList",
        };
        Self(key.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
