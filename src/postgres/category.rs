use chrono::{DateTime, Utc};
use sqlx::{FromRow, Postgres, QueryBuilder};

use super::PgResource;
use crate::{Category, CategoryChanges, NewCategory};

#[derive(FromRow)]
pub struct CategoryRecord {
    id: i64,
    name: String,
    created_by: i64,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    updated_by: Option<i64>,
}

impl From<CategoryRecord> for Category {
    fn from(row: CategoryRecord) -> Self {
        Category {
            id: row.id,
            name: row.name,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
            updated_by: row.updated_by,
        }
    }
}

impl PgResource for Category {
    type Record = CategoryRecord;

    const TABLE: &'static str = "categories";
    const SELECT: &'static str =
        "SELECT id, name, created_by, created_at, updated_at, updated_by FROM categories";
    const ID_COLUMN: &'static str = "id";

    fn push_insert(draft: &NewCategory, qb: &mut QueryBuilder<'static, Postgres>) {
        qb.push("INSERT INTO categories (name, created_by) VALUES (")
            .push_bind(draft.name.clone())
            .push(", ")
            .push_bind(draft.created_by)
            .push(") RETURNING id");
    }

    fn push_update(id: i64, changes: &CategoryChanges, qb: &mut QueryBuilder<'static, Postgres>) {
        qb.push("UPDATE categories SET name = ")
            .push_bind(changes.name.clone())
            .push(", updated_by = ")
            .push_bind(changes.updated_by)
            .push(", updated_at = NOW() WHERE id = ")
            .push_bind(id)
            .push(" RETURNING id");
    }
}
