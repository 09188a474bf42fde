use chrono::{DateTime, Utc};
use sqlx::{FromRow, Postgres, QueryBuilder};

use super::PgResource;
use crate::{Article, ArticleChanges, NewArticle};

#[derive(FromRow)]
pub struct ArticleRecord {
    id: i64,
    user_id: i64,
    category_id: i64,
    title: String,
    content: String,
    tags: Option<String>,
    description: Option<String>,
    image: Option<String>,
    created_by: i64,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    updated_by: Option<i64>,
    user_name: String,
    category_name: String,
    page: Option<String>,
    avatar: Option<String>,
}

impl From<ArticleRecord> for Article {
    fn from(row: ArticleRecord) -> Self {
        Article {
            id: row.id,
            user_id: row.user_id,
            category_id: row.category_id,
            title: row.title,
            content: row.content,
            tags: row.tags,
            description: row.description,
            image: row.image,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
            updated_by: row.updated_by,
            user_name: row.user_name,
            category_name: row.category_name,
            page: row.page,
            avatar: row.avatar,
        }
    }
}

impl PgResource for Article {
    type Record = ArticleRecord;

    const TABLE: &'static str = "articles";
    const SELECT: &'static str = "SELECT a.id, a.user_id, a.category_id, a.title, a.content, a.tags, a.description, a.image, a.created_by, a.created_at, a.updated_at, a.updated_by, u.name AS user_name, c.name AS category_name, u.page, u.avatar FROM articles a JOIN users u ON a.user_id = u.id JOIN categories c ON a.category_id = c.id";
    const ID_COLUMN: &'static str = "a.id";

    fn push_insert(draft: &NewArticle, qb: &mut QueryBuilder<'static, Postgres>) {
        qb.push("INSERT INTO articles (user_id, category_id, title, content, tags, description, image, created_by) VALUES (");
        let mut values = qb.separated(", ");
        values
            .push_bind(draft.user_id)
            .push_bind(draft.category_id)
            .push_bind(draft.title.clone())
            .push_bind(draft.content.clone())
            .push_bind(draft.tags.clone())
            .push_bind(draft.description.clone())
            .push_bind(draft.image.clone())
            .push_bind(draft.created_by);
        values.push_unseparated(") RETURNING id");
    }

    fn push_update(id: i64, changes: &ArticleChanges, qb: &mut QueryBuilder<'static, Postgres>) {
        qb.push("UPDATE articles SET category_id = ")
            .push_bind(changes.category_id)
            .push(", title = ")
            .push_bind(changes.title.clone())
            .push(", content = ")
            .push_bind(changes.content.clone())
            .push(", tags = ")
            .push_bind(changes.tags.clone())
            .push(", description = ")
            .push_bind(changes.description.clone())
            .push(", image = ")
            .push_bind(changes.image.clone())
            .push(", updated_by = ")
            .push_bind(changes.updated_by)
            .push(", updated_at = NOW() WHERE id = ")
            .push_bind(id)
            .push(" RETURNING id");
    }
}
