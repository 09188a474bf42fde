use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{FilterValue, Resource, ResourceKind};

/// Filterable user columns.
pub mod columns {
    pub const ID: &str = "id";
    pub const EMAIL: &str = "email";
    pub const NAME: &str = "name";
    pub const ACTIVE: &str = "active";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Never leaves the process: skipped in responses and cache snapshots.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub online: bool,
    pub active: bool,
    pub avatar: Option<String>,
    pub page: Option<String>,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub active: bool,
    pub avatar: Option<String>,
    pub page: Option<String>,
    pub created_by: i64,
}

/// Full replacement of the mutable user fields. `password_hash` is only
/// written when set.
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub active: bool,
    pub avatar: Option<String>,
    pub page: Option<String>,
    pub updated_by: i64,
}

impl Resource for User {
    type Draft = NewUser;
    type Changes = UserChanges;

    const KIND: ResourceKind = ResourceKind::User;
    const DEPENDENT_LISTS: &'static [ResourceKind] = &[ResourceKind::Article];

    fn id(&self) -> i64 {
        self.id
    }

    fn field(&self, column: &str) -> Option<FilterValue> {
        match column {
            columns::ID => Some(self.id.into()),
            columns::EMAIL => Some(self.email.as_str().into()),
            columns::NAME => Some(self.name.as_str().into()),
            columns::ACTIVE => Some(self.active.into()),
            _ => None,
        }
    }
}
