use crate::crypto::{verify_dummy, verify_password};
use crate::jwt::{IssuedToken, JwtService};
use crate::repository::user_columns;
use crate::{BlogError, Filter, PasswordHasher, Repository, SecretString, SessionStore, User};

pub struct LoginAction<U, S, H> {
    users: U,
    sessions: S,
    jwt: JwtService,
    hasher: H,
}

impl<U, S, H> LoginAction<U, S, H>
where
    U: Repository<User>,
    S: SessionStore,
    H: PasswordHasher + Clone + 'static,
{
    pub fn new(users: U, sessions: S, jwt: JwtService, hasher: H) -> Self {
        LoginAction {
            users,
            sessions,
            jwt,
            hasher,
        }
    }

    /// Checks the credentials of an active user, issues a token and makes it
    /// the user's only valid session.
    ///
    /// Unknown email, inactive account and wrong password all return
    /// `InvalidCredentials`.
    #[tracing::instrument(name = "login", skip_all, err)]
    pub async fn execute(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<(User, IssuedToken), BlogError> {
        let email = email.trim().to_lowercase();
        let filter = Filter::new()
            .eq(user_columns::EMAIL, email)
            .eq(user_columns::ACTIVE, true);

        let Some(user) = self.users.find_one(&filter).await? else {
            // same argon2 cost as a wrong password
            verify_dummy(&self.hasher, password).await?;
            return Err(BlogError::InvalidCredentials);
        };

        if !verify_password(&self.hasher, password, &user.password_hash).await? {
            return Err(BlogError::InvalidCredentials);
        }

        let issued = self.jwt.issue(user.id)?;
        self.sessions
            .put(user.id, &issued.token, self.jwt.expiry())
            .await?;

        tracing::info!(user_id = user.id, "user logged in");
        Ok((user, issued))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::jwt::JwtConfig;
    use crate::{Argon2Hasher, InMemorySessionStore, MockRepository};

    fn user(email: &str, password: &str, active: bool) -> User {
        User {
            id: 1,
            name: "jane".to_owned(),
            email: email.to_owned(),
            password_hash: Argon2Hasher::default().hash(password).unwrap(),
            online: false,
            active,
            avatar: None,
            page: None,
            created_by: 0,
            created_at: Utc::now(),
            updated_at: None,
            updated_by: None,
        }
    }

    fn action(
        users: MockRepository<User>,
        sessions: InMemorySessionStore,
    ) -> LoginAction<MockRepository<User>, InMemorySessionStore, Argon2Hasher> {
        let jwt = JwtService::new(JwtConfig::new("a-test-secret-that-is-long-enough!").unwrap());
        LoginAction::new(users, sessions, jwt, Argon2Hasher::default())
    }

    #[tokio::test]
    async fn test_unknown_email_verifies_with_login_hasher() {
        let hasher = Argon2Hasher::new(4096, 1, 1);
        let jwt = JwtService::new(JwtConfig::new("a-test-secret-that-is-long-enough!").unwrap());
        let login = LoginAction::new(
            MockRepository::<User>::new(),
            InMemorySessionStore::new(),
            jwt,
            hasher.clone(),
        );

        let err = login
            .execute("nobody@example.com", &SecretString::new("password123"))
            .await
            .unwrap_err();
        assert_eq!(err, BlogError::InvalidCredentials);

        // the dummy was built by the hasher the action holds
        let dummy = hasher.dummy_hash().unwrap();
        assert!(dummy.contains("m=4096,t=1,p=1"));
    }

    #[tokio::test]
    async fn test_login_success_stores_session() {
        let users = MockRepository::new();
        users.insert(user("jane@example.com", "password123", true));
        let sessions = InMemorySessionStore::new();
        let login = action(users, sessions.clone());

        let (user, issued) = login
            .execute("Jane@Example.com ", &SecretString::new("password123"))
            .await
            .unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(sessions.get(1).await.unwrap(), Some(issued.token.clone()));
        assert_eq!(login.jwt.verify(&issued.token).unwrap().user_id(), 1);
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let users = MockRepository::new();
        users.insert(user("jane@example.com", "password123", true));
        let sessions = InMemorySessionStore::new();
        let login = action(users, sessions.clone());

        let err = login
            .execute("jane@example.com", &SecretString::new("wrong-password"))
            .await
            .unwrap_err();

        assert_eq!(err, BlogError::InvalidCredentials);
        assert!(sessions.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_email() {
        let login = action(MockRepository::new(), InMemorySessionStore::new());

        let err = login
            .execute("nobody@example.com", &SecretString::new("password123"))
            .await
            .unwrap_err();
        assert_eq!(err, BlogError::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_inactive_user_cannot_login() {
        let users = MockRepository::new();
        users.insert(user("jane@example.com", "password123", false));
        let login = action(users, InMemorySessionStore::new());

        let err = login
            .execute("jane@example.com", &SecretString::new("password123"))
            .await
            .unwrap_err();
        assert_eq!(err, BlogError::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_store_failure_is_not_invalid_credentials() {
        let users = MockRepository::new();
        users.set_failing(true);
        let login = action(users, InMemorySessionStore::new());

        let err = login
            .execute("jane@example.com", &SecretString::new("password123"))
            .await
            .unwrap_err();
        assert!(matches!(err, BlogError::Database(_)));
    }
}
