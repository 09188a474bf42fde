use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use super::error::{AppError, Scope};
use super::routes::AppState;
use crate::{Article, Cache, Category, Repository, SessionStore, User};

const GATE: Scope = Scope::new("auth", "gate");

/// The caller's identity, established by the session gate.
///
/// Extracting it runs the gate; handlers that take it are protected. The
/// identity is also inserted into the request extensions for layers that run
/// after the handler's extractors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: i64,
}

pub fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION)?.to_str().ok()
}

impl<U, A, G, S, C> FromRequestParts<AppState<U, A, G, S, C>> for AuthenticatedUser
where
    U: Repository<User> + Clone + 'static,
    A: Repository<Article> + Clone + 'static,
    G: Repository<Category> + Clone + 'static,
    S: SessionStore + Clone + 'static,
    C: Cache + Clone + 'static,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<U, A, G, S, C>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(*user);
        }

        let id = state
            .gate
            .authorize(authorization_header(&parts.headers))
            .await
            .map_err(GATE.err())?;

        let user = AuthenticatedUser { id };
        parts.extensions.insert(user);
        Ok(user)
    }
}
