use std::future::Future;
use std::marker::PhantomData;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{BlogError, Repository, Resource};

use super::{Cache, CacheKey};

/// A [`Repository`] behind a cache-aside read path.
///
/// Reads are served from the cache when possible. Writes commit to the store
/// first, then evict the item entry, the resource's list entry and the list
/// entries of every kind in [`Resource::DEPENDENT_LISTS`]. A failed write
/// evicts nothing.
pub struct CachedRepository<R, P, C> {
    store: P,
    cache: C,
    ttl: Duration,
    _resource: PhantomData<fn() -> R>,
}

impl<R, P: Clone, C: Clone> Clone for CachedRepository<R, P, C> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            cache: self.cache.clone(),
            ttl: self.ttl,
            _resource: PhantomData,
        }
    }
}

impl<R, P, C> CachedRepository<R, P, C>
where
    R: Resource,
    P: Repository<R>,
    C: Cache,
{
    pub fn new(store: P, cache: C, ttl: Duration) -> Self {
        Self {
            store,
            cache,
            ttl,
            _resource: PhantomData,
        }
    }

    /// The underlying store, for reads that must bypass the cache.
    pub fn store(&self) -> &P {
        &self.store
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Reads one resource, `NotFound` when the store has no such row.
    pub async fn get(&self, id: i64) -> Result<R, BlogError> {
        let key = CacheKey::item(R::KIND, id);
        self.read_through(&key, || self.store.find_by_id(id))
            .await?
            .ok_or(BlogError::NotFound(R::KIND))
    }

    /// Reads the resource listing. `load` runs only on a cache miss and its
    /// result is cached under the single list key for `R`, so every caller
    /// must pass the same query.
    pub async fn list_with<F, Fut>(&self, load: F) -> Result<Vec<R>, BlogError>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<Vec<R>, BlogError>> + Send,
    {
        let key = CacheKey::list(R::KIND);
        let rows = self
            .read_through(&key, || async { load().await.map(Some) })
            .await?;
        Ok(rows.unwrap_or_default())
    }

    pub async fn create(&self, draft: &R::Draft) -> Result<R, BlogError> {
        let created = self.store.create(draft).await?;
        self.invalidate(None).await?;
        Ok(created)
    }

    pub async fn update(&self, id: i64, changes: &R::Changes) -> Result<R, BlogError> {
        let updated = self.store.update(id, changes).await?;
        self.invalidate(Some(id)).await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<(), BlogError> {
        self.store.delete(id).await?;
        self.invalidate(Some(id)).await
    }

    /// Keys a mutation of `R` makes stale.
    pub fn stale_keys(id: Option<i64>) -> Vec<CacheKey> {
        id.map(|id| CacheKey::item(R::KIND, id))
            .into_iter()
            .chain(std::iter::once(CacheKey::list(R::KIND)))
            .chain(R::DEPENDENT_LISTS.iter().map(|kind| CacheKey::list(*kind)))
            .collect()
    }

    async fn invalidate(&self, id: Option<i64>) -> Result<(), BlogError> {
        for key in Self::stale_keys(id) {
            self.cache.delete(&key).await.inspect_err(|e| {
                tracing::warn!(key = %key, error = %e, "cache eviction failed after commit");
            })?;
            tracing::debug!(key = %key, "cache evict");
        }
        Ok(())
    }

    async fn read_through<T, F, Fut>(&self, key: &CacheKey, load: F) -> Result<Option<T>, BlogError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<T>, BlogError>>,
    {
        if let Some(bytes) = self.cache.get(key).await? {
            tracing::debug!(key = %key, "cache hit");
            return serde_json::from_slice(&bytes).map(Some).map_err(BlogError::from);
        }

        tracing::debug!(key = %key, "cache miss");
        let Some(value) = load().await? else {
            return Ok(None);
        };

        let bytes = serde_json::to_vec(&value)?;
        self.cache.set(key, &bytes, self.ttl).await?;
        Ok(Some(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheOp, DEFAULT_TTL, InMemoryCache};
    use crate::repository::{Category, CategoryChanges, Filter, MockRepository, NewCategory};
    use crate::{Article, ResourceKind, User};

    type Categories = CachedRepository<Category, MockRepository<Category>, InMemoryCache>;

    fn setup() -> (Categories, MockRepository<Category>, InMemoryCache) {
        let store = MockRepository::new();
        let cache = InMemoryCache::new();
        let repo = CachedRepository::new(store.clone(), cache.clone(), DEFAULT_TTL);
        (repo, store, cache)
    }

    fn draft(name: &str) -> NewCategory {
        NewCategory {
            name: name.to_owned(),
            created_by: 1,
        }
    }

    fn rename(name: &str) -> CategoryChanges {
        CategoryChanges {
            name: name.to_owned(),
            updated_by: 1,
        }
    }

    #[tokio::test]
    async fn test_second_read_is_served_from_cache() {
        let (repo, store, cache) = setup();
        let created = repo.create(&draft("rust")).await.unwrap();

        let first = repo.get(created.id).await.unwrap();
        let second = repo.get(created.id).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.read_count(), 1);
        assert!(cache.contains(&CacheKey::item(ResourceKind::Category, created.id)));
    }

    #[tokio::test]
    async fn test_missing_row_is_not_found_and_not_cached() {
        let (repo, _, cache) = setup();

        let err = repo.get(99).await.unwrap_err();
        assert_eq!(err, BlogError::NotFound(ResourceKind::Category));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_update_then_read_returns_fresh_value() {
        let (repo, store, cache) = setup();
        let created = repo.create(&draft("rust")).await.unwrap();
        repo.get(created.id).await.unwrap();

        repo.update(created.id, &rename("go")).await.unwrap();
        assert!(!cache.contains(&CacheKey::item(ResourceKind::Category, created.id)));

        let fresh = repo.get(created.id).await.unwrap();
        assert_eq!(fresh.name, "go");
        assert_eq!(store.read_count(), 2);
    }

    #[tokio::test]
    async fn test_preseeded_stale_entry_is_replaced_after_update() {
        let (repo, _, cache) = setup();
        let created = repo.create(&draft("rust")).await.unwrap();

        let mut stale = created.clone();
        stale.name = "stale".to_owned();
        let key = CacheKey::item(ResourceKind::Category, created.id);
        cache
            .set(&key, &serde_json::to_vec(&stale).unwrap(), DEFAULT_TTL)
            .await
            .unwrap();
        assert_eq!(repo.get(created.id).await.unwrap().name, "stale");

        repo.update(created.id, &rename("fresh")).await.unwrap();
        assert_eq!(repo.get(created.id).await.unwrap().name, "fresh");
    }

    #[tokio::test]
    async fn test_list_is_cached_and_invalidated_wholesale() {
        let (repo, store, cache) = setup();
        repo.create(&draft("rust")).await.unwrap();

        let filter = Filter::new();
        let load = || repo.store().list(&filter);
        assert_eq!(repo.list_with(load).await.unwrap().len(), 1);
        assert_eq!(repo.list_with(load).await.unwrap().len(), 1);
        assert_eq!(store.read_count(), 1);

        repo.create(&draft("go")).await.unwrap();
        assert!(!cache.contains(&CacheKey::list(ResourceKind::Category)));
        assert_eq!(repo.list_with(load).await.unwrap().len(), 2);
        assert_eq!(store.read_count(), 2);
    }

    #[tokio::test]
    async fn test_category_write_evicts_article_list() {
        let (repo, _, cache) = setup();
        let created = repo.create(&draft("rust")).await.unwrap();
        let article_list = CacheKey::list(ResourceKind::Article);
        cache.set(&article_list, b"[]", DEFAULT_TTL).await.unwrap();

        repo.update(created.id, &rename("go")).await.unwrap();
        assert!(!cache.contains(&article_list));
    }

    #[tokio::test]
    async fn test_failed_write_evicts_nothing() {
        let (repo, store, cache) = setup();
        let created = repo.create(&draft("rust")).await.unwrap();
        repo.get(created.id).await.unwrap();

        store.set_failing(true);
        assert!(repo.update(created.id, &rename("go")).await.is_err());
        assert!(cache.contains(&CacheKey::item(ResourceKind::Category, created.id)));
    }

    #[tokio::test]
    async fn test_delete_missing_row_is_not_found() {
        let (repo, _, _) = setup();
        assert_eq!(
            repo.delete(7).await.unwrap_err(),
            BlogError::NotFound(ResourceKind::Category)
        );
    }

    #[tokio::test]
    async fn test_cache_read_error_is_not_a_miss() {
        let (repo, store, cache) = setup();
        let created = repo.create(&draft("rust")).await.unwrap();
        cache.set_unavailable(true);

        assert!(matches!(
            repo.get(created.id).await,
            Err(BlogError::Cache(CacheOp::Get, _))
        ));
        assert_eq!(store.read_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_fill_on_miss_is_an_error() {
        let (repo, store, cache) = setup();
        let created = repo.create(&draft("rust")).await.unwrap();
        cache.fail_on(CacheOp::Set);

        assert!(matches!(
            repo.get(created.id).await,
            Err(BlogError::Cache(CacheOp::Set, _))
        ));
        let filter = Filter::new();
        assert!(matches!(
            repo.list_with(|| repo.store().list(&filter)).await,
            Err(BlogError::Cache(CacheOp::Set, _))
        ));
        // the store was read both times; nothing was cached
        assert_eq!(store.read_count(), 2);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_eviction_failure_surfaces_after_commit() {
        let (repo, store, cache) = setup();
        let created = repo.create(&draft("rust")).await.unwrap();
        cache.set_unavailable(true);

        assert!(matches!(
            repo.update(created.id, &rename("go")).await,
            Err(BlogError::Cache(CacheOp::Delete, _))
        ));
        let rows = store.rows.lock().unwrap();
        assert_eq!(rows[0].name, "go");
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_is_an_error() {
        let (repo, _, cache) = setup();
        let key = CacheKey::item(ResourceKind::Category, 1);
        cache.set(&key, b"not json", DEFAULT_TTL).await.unwrap();

        assert!(matches!(repo.get(1).await, Err(BlogError::Serialization(_))));
    }

    #[test]
    fn test_stale_keys() {
        let keys: Vec<String> =
            CachedRepository::<User, MockRepository<User>, InMemoryCache>::stale_keys(Some(3))
                .iter()
                .map(ToString::to_string)
                .collect();
        assert_eq!(keys, vec!["user:3", "userList", "articleList"]);

        let keys: Vec<String> =
            CachedRepository::<Article, MockRepository<Article>, InMemoryCache>::stale_keys(None)
                .iter()
                .map(ToString::to_string)
                .collect();
        assert_eq!(keys, vec!["articleList"]);
    }
}
