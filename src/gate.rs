//! Request authentication.
//!
//! A request is authorized only when all of the following hold:
//!
//! 1. it carries `Authorization: Bearer <token>`;
//! 2. the token's signature, issuer and expiry verify;
//! 3. the session store holds a record for the token's user;
//! 4. that record is byte-for-byte the presented token.
//!
//! Any failure rejects the request. The gate never issues or refreshes
//! tokens; a second login replaces the stored token, so older tokens fail
//! step 4 even though their signature is still valid.

use crate::BlogError;
use crate::jwt::JwtService;
use crate::session::SessionStore;

/// Returns the token of a `Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[derive(Clone)]
pub struct SessionGate<S> {
    jwt: JwtService,
    sessions: S,
}

impl<S: SessionStore> SessionGate<S> {
    pub fn new(jwt: JwtService, sessions: S) -> Self {
        Self { jwt, sessions }
    }

    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    pub fn sessions(&self) -> &S {
        &self.sessions
    }

    /// Authorizes a raw `Authorization` header value and returns the user id.
    ///
    /// # Errors
    ///
    /// - `TokenRequired`: header missing or not a bearer token
    /// - `TokenInvalid` / `TokenExpired`: signature, issuer or expiry check failed
    /// - `SessionUnavailable`: the session store could not be read
    /// - `SessionMismatch`: no session, or a different token is current
    pub async fn authorize(&self, header: Option<&str>) -> Result<i64, BlogError> {
        let token = header
            .and_then(bearer_token)
            .ok_or(BlogError::TokenRequired)?;

        let claims = self.jwt.verify(token).inspect_err(|e| {
            tracing::warn!(error = %e, "rejected token");
        })?;
        let user_id = claims.user_id();

        let current = self.sessions.get(user_id).await.inspect_err(|e| {
            tracing::warn!(user_id, error = %e, "session lookup failed");
        })?;

        match current {
            Some(stored) if stored == token => Ok(user_id),
            _ => {
                tracing::warn!(user_id, "token does not match current session");
                Err(BlogError::SessionMismatch)
            }
        }
    }
}
