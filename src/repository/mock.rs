#![allow(clippy::unwrap_used)]

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use crate::BlogError;

use super::{
    Article, ArticleChanges, Category, CategoryChanges, Filter, NewArticle, NewCategory, NewUser,
    Repository, Resource, User, UserChanges,
};

/// How a resource is built and edited without a database.
pub trait InMemoryResource: Resource {
    fn from_draft(id: i64, draft: &Self::Draft) -> Self;
    fn apply_changes(&mut self, changes: &Self::Changes);
}

/// In-memory [`Repository`] for tests.
///
/// Counts every read so cache tests can assert the durable store was skipped.
/// `set_failing(true)` makes every call fail with a database error.
#[derive(Clone)]
pub struct MockRepository<R> {
    pub rows: Arc<Mutex<Vec<R>>>,
    next_id: Arc<AtomicI64>,
    reads: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
}

impl<R: InMemoryResource> MockRepository<R> {
    pub fn new() -> Self {
        Self {
            rows: Arc::new(Mutex::new(vec![])),
            next_id: Arc::new(AtomicI64::new(1)),
            reads: Arc::new(AtomicUsize::new(0)),
            failing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Number of `find_by_id`, `find_one` and `list` calls so far.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Inserts a row as-is, bypassing `create`.
    pub fn insert(&self, row: R) {
        self.next_id.fetch_max(row.id() + 1, Ordering::SeqCst);
        self.rows.lock().unwrap().push(row);
    }

    fn check(&self) -> Result<(), BlogError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(BlogError::Database("connection refused".to_owned()));
        }
        Ok(())
    }

    fn record_read(&self) -> Result<(), BlogError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check()
    }
}

impl<R: InMemoryResource> Default for MockRepository<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: InMemoryResource> Repository<R> for MockRepository<R> {
    async fn create(&self, draft: &R::Draft) -> Result<R, BlogError> {
        self.check()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let row = R::from_draft(id, draft);

        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<R>, BlogError> {
        self.record_read()?;
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|r| r.id() == id).cloned())
    }

    async fn find_one(&self, filter: &Filter) -> Result<Option<R>, BlogError> {
        self.record_read()?;
        let rows = self.rows.lock().unwrap().clone();
        Ok(filter.apply(rows).into_iter().next())
    }

    async fn list(&self, filter: &Filter) -> Result<Vec<R>, BlogError> {
        self.record_read()?;
        let rows = self.rows.lock().unwrap().clone();
        Ok(filter.apply(rows))
    }

    async fn update(&self, id: i64, changes: &R::Changes) -> Result<R, BlogError> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or(BlogError::NotFound(R::KIND))?;

        row.apply_changes(changes);
        Ok(row.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), BlogError> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id() != id);

        if rows.len() == before {
            return Err(BlogError::NotFound(R::KIND));
        }
        Ok(())
    }
}

impl InMemoryResource for User {
    fn from_draft(id: i64, draft: &NewUser) -> Self {
        User {
            id,
            name: draft.name.clone(),
            email: draft.email.clone(),
            password_hash: draft.password_hash.clone(),
            online: false,
            active: draft.active,
            avatar: draft.avatar.clone(),
            page: draft.page.clone(),
            created_by: draft.created_by,
            created_at: Utc::now(),
            updated_at: None,
            updated_by: None,
        }
    }

    fn apply_changes(&mut self, changes: &UserChanges) {
        self.name.clone_from(&changes.name);
        self.email.clone_from(&changes.email);
        if let Some(hash) = &changes.password_hash {
            self.password_hash.clone_from(hash);
        }
        self.active = changes.active;
        self.avatar.clone_from(&changes.avatar);
        self.page.clone_from(&changes.page);
        self.updated_by = Some(changes.updated_by);
        self.updated_at = Some(Utc::now());
    }
}

impl InMemoryResource for Category {
    fn from_draft(id: i64, draft: &NewCategory) -> Self {
        Category {
            id,
            name: draft.name.clone(),
            created_by: draft.created_by,
            created_at: Utc::now(),
            updated_at: None,
            updated_by: None,
        }
    }

    fn apply_changes(&mut self, changes: &CategoryChanges) {
        self.name.clone_from(&changes.name);
        self.updated_by = Some(changes.updated_by);
        self.updated_at = Some(Utc::now());
    }
}

// No joins in memory: user and category names stay empty.
impl InMemoryResource for Article {
    fn from_draft(id: i64, draft: &NewArticle) -> Self {
        Article {
            id,
            user_id: draft.user_id,
            category_id: draft.category_id,
            title: draft.title.clone(),
            content: draft.content.clone(),
            tags: draft.tags.clone(),
            description: draft.description.clone(),
            image: draft.image.clone(),
            created_by: draft.created_by,
            created_at: Utc::now(),
            updated_at: None,
            updated_by: None,
            user_name: String::new(),
            category_name: String::new(),
            page: None,
            avatar: None,
        }
    }

    fn apply_changes(&mut self, changes: &ArticleChanges) {
        self.category_id = changes.category_id;
        self.title.clone_from(&changes.title);
        self.content.clone_from(&changes.content);
        self.tags.clone_from(&changes.tags);
        self.description.clone_from(&changes.description);
        self.image.clone_from(&changes.image);
        self.updated_by = Some(changes.updated_by);
        self.updated_at = Some(Utc::now());
    }
}
