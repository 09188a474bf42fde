//! Resource types and the storage abstraction shared by all of them.
//!
//! Every resource (user, article, category) goes through the same
//! [`Repository`] trait. Implement it once per storage backend; the resource
//! type parameter supplies the create and update payloads.
//!
//! | Type | Draft | Changes |
//! |------|-------|---------|
//! | [`User`] | [`NewUser`] | [`UserChanges`] |
//! | [`Category`] | [`NewCategory`] | [`CategoryChanges`] |
//! | [`Article`] | [`NewArticle`] | [`ArticleChanges`] |
//!
//! Enable the `mocks` feature for [`MockRepository`], an in-memory
//! implementation that counts durable-store reads.

mod article;
mod category;
mod filter;
mod user;

#[cfg(any(test, feature = "mocks"))]
mod mock;

use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::BlogError;

pub use article::{Article, ArticleChanges, NewArticle, columns as article_columns};
pub use category::{Category, CategoryChanges, NewCategory, columns as category_columns};
pub use filter::{Direction, Filter, FilterValue, Op, OrderBy, Predicate};
pub use user::{NewUser, User, UserChanges, columns as user_columns};

#[cfg(any(test, feature = "mocks"))]
pub use mock::{InMemoryResource, MockRepository};

/// The resource types the blog stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    User,
    Article,
    Category,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Article => "article",
            Self::Category => "category",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row type owned by the durable store.
///
/// Cached copies are JSON snapshots of this type, so it must round-trip
/// through serde.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Payload for [`Repository::create`].
    type Draft: Send + Sync;
    /// Payload for [`Repository::update`].
    type Changes: Send + Sync;

    const KIND: ResourceKind;

    /// Other kinds whose cached lists embed fields of this resource.
    /// Mutations of this resource invalidate those lists too.
    const DEPENDENT_LISTS: &'static [ResourceKind] = &[];

    fn id(&self) -> i64;

    /// Value of a filterable column, `None` for unknown columns or SQL NULL.
    fn field(&self, column: &str) -> Option<FilterValue>;
}

/// Durable storage for one resource type.
///
/// Single-row reads return `Ok(None)` when the row does not exist. `update`
/// and `delete` return `BlogError::NotFound` when no row matched.
#[async_trait]
pub trait Repository<R: Resource>: Send + Sync {
    async fn create(&self, draft: &R::Draft) -> Result<R, BlogError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<R>, BlogError>;

    async fn find_one(&self, filter: &Filter) -> Result<Option<R>, BlogError>;

    async fn list(&self, filter: &Filter) -> Result<Vec<R>, BlogError>;

    async fn update(&self, id: i64, changes: &R::Changes) -> Result<R, BlogError>;

    async fn delete(&self, id: i64) -> Result<(), BlogError>;
}
