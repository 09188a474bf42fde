use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{FilterValue, Resource, ResourceKind};

pub mod columns {
    pub const ID: &str = "id";
    pub const NAME: &str = "name";
    pub const UPDATED_BY: &str = "updated_by";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub created_by: i64,
}

#[derive(Debug, Clone)]
pub struct CategoryChanges {
    pub name: String,
    pub updated_by: i64,
}

impl Resource for Category {
    type Draft = NewCategory;
    type Changes = CategoryChanges;

    const KIND: ResourceKind = ResourceKind::Category;
    // Article rows carry the category name.
    const DEPENDENT_LISTS: &'static [ResourceKind] = &[ResourceKind::Article];

    fn id(&self) -> i64 {
        self.id
    }

    fn field(&self, column: &str) -> Option<FilterValue> {
        match column {
            columns::ID => Some(self.id.into()),
            columns::NAME => Some(self.name.as_str().into()),
            columns::UPDATED_BY => self.updated_by.map(FilterValue::from),
            _ => None,
        }
    }
}
