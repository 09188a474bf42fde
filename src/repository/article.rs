use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{FilterValue, Resource, ResourceKind};

/// Filterable article columns. Article queries join users and categories, so
/// the names are table-qualified.
pub mod columns {
    pub const ID: &str = "a.id";
    pub const USER_ID: &str = "a.user_id";
    pub const CATEGORY_ID: &str = "a.category_id";
    pub const TITLE: &str = "a.title";
}

/// An article joined with its author and category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub user_id: i64,
    pub category_id: i64,
    pub title: String,
    pub content: String,
    pub tags: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<i64>,
    pub user_name: String,
    pub category_name: String,
    pub page: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewArticle {
    pub user_id: i64,
    pub category_id: i64,
    pub title: String,
    pub content: String,
    pub tags: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub created_by: i64,
}

/// Full replacement of the editable article fields. The author is fixed at
/// creation.
#[derive(Debug, Clone)]
pub struct ArticleChanges {
    pub category_id: i64,
    pub title: String,
    pub content: String,
    pub tags: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub updated_by: i64,
}

impl Resource for Article {
    type Draft = NewArticle;
    type Changes = ArticleChanges;

    const KIND: ResourceKind = ResourceKind::Article;

    fn id(&self) -> i64 {
        self.id
    }

    fn field(&self, column: &str) -> Option<FilterValue> {
        match column {
            columns::ID => Some(self.id.into()),
            columns::USER_ID => Some(self.user_id.into()),
            columns::CATEGORY_ID => Some(self.category_id.into()),
            columns::TITLE => Some(self.title.as_str().into()),
            _ => None,
        }
    }
}
