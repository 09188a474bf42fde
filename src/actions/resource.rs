use crate::{BlogError, Cache, CachedRepository, Repository, Resource};

/// Cache-aside read of one resource.
pub struct GetResourceAction<R, P, C> {
    repository: CachedRepository<R, P, C>,
}

impl<R: Resource, P: Repository<R>, C: Cache> GetResourceAction<R, P, C> {
    pub fn new(repository: CachedRepository<R, P, C>) -> Self {
        GetResourceAction { repository }
    }

    #[tracing::instrument(name = "get_resource", skip_all, fields(kind = %R::KIND, id = id), err)]
    pub async fn execute(&self, id: i64) -> Result<R, BlogError> {
        self.repository.get(id).await
    }
}

/// Deletes a resource, then evicts its cache entries.
pub struct DeleteResourceAction<R, P, C> {
    repository: CachedRepository<R, P, C>,
}

impl<R: Resource, P: Repository<R>, C: Cache> DeleteResourceAction<R, P, C> {
    pub fn new(repository: CachedRepository<R, P, C>) -> Self {
        DeleteResourceAction { repository }
    }

    #[tracing::instrument(name = "delete_resource", skip_all, fields(kind = %R::KIND, id = id), err)]
    pub async fn execute(&self, id: i64) -> Result<(), BlogError> {
        self.repository.delete(id).await
    }
}
