use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::BlogError;

use super::{Cache, CacheKey, CacheOp};

/// In-memory cache for tests and single-process development.
///
/// Expired entries read as misses and are dropped on the next `set`.
#[derive(Clone, Default)]
pub struct InMemoryCache {
    entries: Arc<RwLock<HashMap<String, (Vec<u8>, Instant)>>>,
    #[cfg(any(test, feature = "mocks"))]
    failing: Arc<RwLock<std::collections::HashSet<CacheOp>>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if a live entry exists for `key`.
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries
            .read()
            .map(|guard| {
                guard
                    .get(key.as_str())
                    .is_some_and(|(_, expires_at)| *expires_at > Instant::now())
            })
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Makes every call fail as if the cache server were down.
    #[cfg(any(test, feature = "mocks"))]
    pub fn set_unavailable(&self, unavailable: bool) {
        let mut failing = self.failing.write().unwrap_or_else(|e| e.into_inner());
        failing.clear();
        if unavailable {
            failing.extend([CacheOp::Get, CacheOp::Set, CacheOp::Delete]);
        }
    }

    /// Makes only `op` fail; the other calls keep working.
    #[cfg(any(test, feature = "mocks"))]
    pub fn fail_on(&self, op: CacheOp) {
        self.failing
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(op);
    }

    #[cfg_attr(not(any(test, feature = "mocks")), allow(unused_variables))]
    fn check(&self, op: CacheOp) -> Result<(), BlogError> {
        #[cfg(any(test, feature = "mocks"))]
        if self.failing.read().map_err(poisoned(op))?.contains(&op) {
            return Err(BlogError::Cache(op, "connection refused".to_owned()));
        }
        Ok(())
    }
}

fn poisoned<T>(op: CacheOp) -> impl FnOnce(T) -> BlogError {
    move |_| BlogError::Cache(op, "lock poisoned".to_owned())
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<Vec<u8>>, BlogError> {
        self.check(CacheOp::Get)?;
        let entries = self.entries.read().map_err(poisoned(CacheOp::Get))?;

        Ok(entries
            .get(key.as_str())
            .filter(|(_, expires_at)| *expires_at > Instant::now())
            .map(|(value, _)| value.clone()))
    }

    async fn set(&self, key: &CacheKey, value: &[u8], ttl: Duration) -> Result<(), BlogError> {
        self.check(CacheOp::Set)?;
        let now = Instant::now();
        let mut entries = self.entries.write().map_err(poisoned(CacheOp::Set))?;
        entries.retain(|_, (_, expires_at)| *expires_at > now);
        entries.insert(key.as_str().to_owned(), (value.to_vec(), now + ttl));
        Ok(())
    }

    async fn delete(&self, key: &CacheKey) -> Result<(), BlogError> {
        self.check(CacheOp::Delete)?;
        self.entries
            .write()
            .map_err(poisoned(CacheOp::Delete))?
            .remove(key.as_str());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ResourceKind;

    #[tokio::test]
    async fn test_set_then_get() {
        let cache = InMemoryCache::new();
        let key = CacheKey::item(ResourceKind::Article, 1);

        cache.set(&key, b"{}", Duration::from_secs(60)).await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap().as_deref(), Some(&b"{}"[..]));
        assert!(cache.contains(&key));
    }

    #[tokio::test]
    async fn test_expired_entry_is_a_miss() {
        let cache = InMemoryCache::new();
        let key = CacheKey::list(ResourceKind::Article);

        cache.set(&key, b"[]", Duration::ZERO).await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_missing_key_is_ok() {
        let cache = InMemoryCache::new();
        let key = CacheKey::item(ResourceKind::User, 404);

        assert!(cache.delete(&key).await.is_ok());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_unavailable_cache_errors() {
        let cache = InMemoryCache::new();
        let key = CacheKey::item(ResourceKind::User, 1);
        cache.set_unavailable(true);

        assert!(matches!(
            cache.get(&key).await,
            Err(BlogError::Cache(CacheOp::Get, _))
        ));
        assert!(matches!(
            cache.delete(&key).await,
            Err(BlogError::Cache(CacheOp::Delete, _))
        ));

        cache.set_unavailable(false);
        assert!(cache.get(&key).await.is_ok());
    }

    #[tokio::test]
    async fn test_fail_on_single_operation() {
        let cache = InMemoryCache::new();
        let key = CacheKey::item(ResourceKind::User, 1);
        cache.fail_on(CacheOp::Set);

        assert_eq!(cache.get(&key).await.unwrap(), None);
        assert!(matches!(
            cache.set(&key, b"{}", Duration::from_secs(60)).await,
            Err(BlogError::Cache(CacheOp::Set, _))
        ));
        assert!(cache.delete(&key).await.is_ok());
    }

    #[tokio::test]
    async fn test_expired_entries_are_purged_on_set() {
        let cache = InMemoryCache::new();
        let stale = CacheKey::item(ResourceKind::Article, 1);
        let fresh = CacheKey::item(ResourceKind::Article, 2);

        cache.set(&stale, b"{}", Duration::ZERO).await.unwrap();
        assert_eq!(cache.len(), 1);

        cache.set(&fresh, b"{}", Duration::from_secs(60)).await.unwrap();
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&fresh));
    }
}
