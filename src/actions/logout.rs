use crate::{BlogError, SessionStore};

pub struct LogoutAction<S: SessionStore> {
    sessions: S,
}

impl<S: SessionStore> LogoutAction<S> {
    pub fn new(sessions: S) -> Self {
        LogoutAction { sessions }
    }

    /// Clears the user's session. Succeeds when there is none.
    #[tracing::instrument(name = "logout", skip_all, fields(user_id = user_id), err)]
    pub async fn execute(&self, user_id: i64) -> Result<(), BlogError> {
        self.sessions.delete(user_id).await?;
        tracing::info!(user_id, "user logged out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::InMemorySessionStore;

    #[tokio::test]
    async fn test_logout_removes_session() {
        let sessions = InMemorySessionStore::new();
        sessions.put(1, "token", Duration::hours(1)).await.unwrap();

        LogoutAction::new(sessions.clone()).execute(1).await.unwrap();
        assert_eq!(sessions.get(1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_logout_without_session() {
        let sessions = InMemorySessionStore::new();
        assert!(LogoutAction::new(sessions).execute(1).await.is_ok());
    }
}
