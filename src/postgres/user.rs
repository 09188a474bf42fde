use chrono::{DateTime, Utc};
use sqlx::{FromRow, Postgres, QueryBuilder};

use super::PgResource;
use crate::{NewUser, User, UserChanges};

#[derive(FromRow)]
pub struct UserRecord {
    id: i64,
    name: String,
    email: String,
    password_hash: String,
    online: bool,
    active: bool,
    avatar: Option<String>,
    page: Option<String>,
    created_by: i64,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    updated_by: Option<i64>,
}

impl From<UserRecord> for User {
    fn from(row: UserRecord) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            online: row.online,
            active: row.active,
            avatar: row.avatar,
            page: row.page,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
            updated_by: row.updated_by,
        }
    }
}

impl PgResource for User {
    type Record = UserRecord;

    const TABLE: &'static str = "users";
    const SELECT: &'static str = "SELECT id, name, email, password_hash, online, active, avatar, page, created_by, created_at, updated_at, updated_by FROM users";
    const ID_COLUMN: &'static str = "id";

    fn push_insert(draft: &NewUser, qb: &mut QueryBuilder<'static, Postgres>) {
        qb.push(
            "INSERT INTO users (name, email, password_hash, active, avatar, page, created_by) VALUES (",
        );
        let mut values = qb.separated(", ");
        values
            .push_bind(draft.name.clone())
            .push_bind(draft.email.clone())
            .push_bind(draft.password_hash.clone())
            .push_bind(draft.active)
            .push_bind(draft.avatar.clone())
            .push_bind(draft.page.clone())
            .push_bind(draft.created_by);
        values.push_unseparated(") RETURNING id");
    }

    fn push_update(id: i64, changes: &UserChanges, qb: &mut QueryBuilder<'static, Postgres>) {
        qb.push("UPDATE users SET name = ")
            .push_bind(changes.name.clone())
            .push(", email = ")
            .push_bind(changes.email.clone())
            .push(", active = ")
            .push_bind(changes.active)
            .push(", avatar = ")
            .push_bind(changes.avatar.clone())
            .push(", page = ")
            .push_bind(changes.page.clone());

        if let Some(hash) = &changes.password_hash {
            qb.push(", password_hash = ").push_bind(hash.clone());
        }

        qb.push(", updated_by = ")
            .push_bind(changes.updated_by)
            .push(", updated_at = NOW() WHERE id = ")
            .push_bind(id)
            .push(" RETURNING id");
    }
}
