use serde::Deserialize;

use crate::crypto::hash_password;
use crate::repository::{Direction, Op, user_columns};
use crate::validators::{validate_email, validate_name, validate_password};
use crate::{
    BlogError, Cache, CachedRepository, Filter, NewUser, PasswordHasher, Repository, ResourceKind,
    SecretString, SessionStore, User, UserChanges,
};

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserInput {
    pub name: String,
    pub email: String,
    pub password: SecretString,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
}

/// Replaces the user's profile. The password only changes when given.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserInput {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub password: Option<SecretString>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
}

/// Lower-cases and validates a name/email pair.
fn normalize(name: &str, email: &str) -> Result<(String, String), BlogError> {
    let name = name.trim().to_lowercase();
    let email = email.trim().to_lowercase();
    validate_name(&name)?;
    validate_email(&email)?;
    Ok((name, email))
}

async fn ensure_email_free<U: Repository<User>>(
    users: &U,
    email: &str,
    except: Option<i64>,
) -> Result<(), BlogError> {
    let mut filter = Filter::new().eq(user_columns::EMAIL, email);
    if let Some(id) = except {
        filter = filter.with(user_columns::ID, Op::Ne, id);
    }

    match users.find_one(&filter).await? {
        Some(_) => Err(BlogError::AlreadyExists(ResourceKind::User)),
        None => Ok(()),
    }
}

pub struct CreateUserAction<U, C, H> {
    users: CachedRepository<User, U, C>,
    hasher: H,
}

impl<U, C, H> CreateUserAction<U, C, H>
where
    U: Repository<User>,
    C: Cache,
    H: PasswordHasher + Clone + 'static,
{
    pub fn new(users: CachedRepository<User, U, C>, hasher: H) -> Self {
        CreateUserAction { users, hasher }
    }

    #[tracing::instrument(name = "create_user", skip_all, fields(actor = actor), err)]
    pub async fn execute(&self, actor: i64, input: &CreateUserInput) -> Result<User, BlogError> {
        let (name, email) = normalize(&input.name, &input.email)?;
        validate_password(input.password.expose_secret())?;
        ensure_email_free(self.users.store(), &email, None).await?;

        let password_hash = hash_password(&self.hasher, &input.password).await?;
        let user = self
            .users
            .create(&NewUser {
                name,
                email,
                password_hash,
                active: input.active,
                avatar: input.avatar.clone(),
                page: input.page.clone(),
                created_by: actor,
            })
            .await?;

        tracing::info!(user_id = user.id, "user created");
        Ok(user)
    }
}

pub struct UpdateUserAction<U, C, S, H> {
    users: CachedRepository<User, U, C>,
    sessions: S,
    hasher: H,
}

impl<U, C, S, H> UpdateUserAction<U, C, S, H>
where
    U: Repository<User>,
    C: Cache,
    S: SessionStore,
    H: PasswordHasher + Clone + 'static,
{
    pub fn new(users: CachedRepository<User, U, C>, sessions: S, hasher: H) -> Self {
        UpdateUserAction {
            users,
            sessions,
            hasher,
        }
    }

    /// Deactivating a user also ends their session.

    #[tracing::instrument(name = "update_user", skip_all, fields(actor = actor, user_id = id), err)]
    pub async fn execute(
        &self,
        actor: i64,
        id: i64,
        input: &UpdateUserInput,
    ) -> Result<User, BlogError> {
        let (name, email) = normalize(&input.name, &input.email)?;
        let password_hash = match &input.password {
            Some(password) => {
                validate_password(password.expose_secret())?;
                Some(hash_password(&self.hasher, password).await?)
            }
            None => None,
        };
        ensure_email_free(self.users.store(), &email, Some(id)).await?;

        let user = self
            .users
            .update(
                id,
                &UserChanges {
                    name,
                    email,
                    password_hash,
                    active: input.active,
                    avatar: input.avatar.clone(),
                    page: input.page.clone(),
                    updated_by: actor,
                },
            )
            .await?;

        if !user.active {
            self.sessions.delete(user.id).await?;
            tracing::info!(user_id = user.id, "session revoked for inactive user");
        }
        Ok(user)
    }
}

/// Deletes a user, then their session, so an outstanding token stops passing
/// the gate.
pub struct DeleteUserAction<U, C, S> {
    users: CachedRepository<User, U, C>,
    sessions: S,
}

impl<U, C, S> DeleteUserAction<U, C, S>
where
    U: Repository<User>,
    C: Cache,
    S: SessionStore,
{
    pub fn new(users: CachedRepository<User, U, C>, sessions: S) -> Self {
        DeleteUserAction { users, sessions }
    }

    #[tracing::instrument(name = "delete_user", skip_all, fields(user_id = id), err)]
    pub async fn execute(&self, id: i64) -> Result<(), BlogError> {
        self.users.delete(id).await?;
        self.sessions.delete(id).await?;
        tracing::info!(user_id = id, "user deleted");
        Ok(())
    }
}

/// All users by id, cached under `userList`.
pub struct ListUsersAction<U, C> {
    users: CachedRepository<User, U, C>,
}

impl<U: Repository<User>, C: Cache> ListUsersAction<U, C> {
    pub fn new(users: CachedRepository<User, U, C>) -> Self {
        ListUsersAction { users }
    }

    #[tracing::instrument(name = "list_users", skip_all, err)]
    pub async fn execute(&self) -> Result<Vec<User>, BlogError> {
        let filter = Filter::new().order_by(user_columns::ID, Direction::Asc);
        let store = self.users.store();
        self.users.list_with(|| store.list(&filter)).await
    }
}
