//! PostgreSQL storage.
//!
//! One generic [`PostgresRepository`] serves every resource; each resource
//! only supplies its row record, its `SELECT` and how to render an insert and
//! an update. All values are bound parameters.
//!
//! The schema lives in `migrations/`; [`run_migrations`] applies it.

mod article;
mod category;
mod repository;
mod user;

use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use crate::{Article, Category, Resource, User};

pub use repository::PostgresRepository;

pub type PostgresUserRepository = PostgresRepository<User>;
pub type PostgresCategoryRepository = PostgresRepository<Category>;
pub type PostgresArticleRepository = PostgresRepository<Article>;

/// Table mapping for a [`Resource`].
pub trait PgResource: Resource {
    type Record: for<'r> FromRow<'r, PgRow> + Send + Unpin + Into<Self>;

    /// Table written by inserts, updates and deletes.
    const TABLE: &'static str;

    /// `SELECT ... FROM ...` without a WHERE clause.
    const SELECT: &'static str;

    /// Primary key as it appears in [`Self::SELECT`].
    const ID_COLUMN: &'static str;

    /// Pushes `INSERT INTO ... VALUES (...) RETURNING id`.
    fn push_insert(draft: &Self::Draft, qb: &mut QueryBuilder<'static, Postgres>);

    /// Pushes `UPDATE ... SET ... WHERE id = $n RETURNING id`.
    fn push_update(id: i64, changes: &Self::Changes, qb: &mut QueryBuilder<'static, Postgres>);
}

/// Creates the repository for every resource from one pool.
pub fn create_repositories(
    pool: PgPool,
) -> (
    PostgresUserRepository,
    PostgresCategoryRepository,
    PostgresArticleRepository,
) {
    (
        PostgresRepository::new(pool.clone()),
        PostgresRepository::new(pool.clone()),
        PostgresRepository::new(pool),
    )
}

/// Creates the `users`, `categories` and `articles` tables if needed.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
