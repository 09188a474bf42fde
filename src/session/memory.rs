use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::BlogError;

use super::SessionStore;

/// In-memory session storage.
///
/// Expired entries are ignored on read and dropped on the next write to the
/// same user. Sessions are lost when the process restarts.
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<i64, (String, DateTime<Utc>)>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored sessions, expired ones included.
    pub fn len(&self) -> usize {
        self.sessions.read().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> BlogError {
    BlogError::SessionUnavailable("lock poisoned".to_owned())
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn put(&self, user_id: i64, token: &str, ttl: Duration) -> Result<(), BlogError> {
        let expires_at = Utc::now() + ttl;
        self.sessions
            .write()
            .map_err(poisoned)?
            .insert(user_id, (token.to_owned(), expires_at));
        Ok(())
    }

    async fn get(&self, user_id: i64) -> Result<Option<String>, BlogError> {
        let sessions = self.sessions.read().map_err(poisoned)?;

        Ok(sessions
            .get(&user_id)
            .filter(|(_, expires_at)| *expires_at > Utc::now())
            .map(|(token, _)| token.clone()))
    }

    async fn delete(&self, user_id: i64) -> Result<(), BlogError> {
        self.sessions.write().map_err(poisoned)?.remove(&user_id);
        Ok(())
    }
}
