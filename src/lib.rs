//! Blogging backend core.
//!
//! Users, articles and categories are stored in PostgreSQL. Reads go through a
//! cache-aside layer (Redis in production), writes invalidate the affected cache
//! entries after they commit, and every resource route sits behind a bearer
//! token gate that checks both the token signature and the user's current
//! session.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`crypto`] | Password hashing (argon2id) |
//! | [`jwt`] | Session token issuing and verification |
//! | [`session`] | Single-slot session store per user |
//! | [`gate`] | Request authentication gate |
//! | [`cache`] | Cache stores, keys and the cache-aside repository wrapper |
//! | [`repository`] | Resource types and the generic [`Repository`] trait |
//! | `postgres` | sqlx implementation of [`Repository`] (`sqlx_postgres` feature) |
//! | [`actions`] | Login, logout and resource operations |
//! | [`api`] | Axum routes, handlers and error mapping |
//! | [`config`] | Environment-driven service configuration |

pub mod actions;
pub mod api;
pub mod cache;
pub mod config;
pub mod crypto;
pub mod gate;
pub mod jwt;
#[cfg(feature = "sqlx_postgres")]
pub mod postgres;
pub mod repository;
mod secret;
pub mod session;
pub mod tracing_config;
pub mod validators;

pub use cache::{Cache, CacheKey, CacheOp, CachedRepository, InMemoryCache};
pub use config::BlogConfig;
pub use crypto::{Argon2Hasher, PasswordHasher};
pub use gate::SessionGate;
pub use repository::{
    Article, ArticleChanges, Category, CategoryChanges, Filter, NewArticle, NewCategory, NewUser,
    Repository, Resource, ResourceKind, User, UserChanges,
};
pub use secret::SecretString;
pub use session::{InMemorySessionStore, SessionStore};

#[cfg(any(test, feature = "mocks"))]
pub use repository::MockRepository;

use validators::ValidationError;

/// Errors produced by the blog core.
///
/// Cache misses and "no such row" results are not errors at the store level;
/// they only become [`BlogError::NotFound`] once a caller asked for something
/// that must exist.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BlogError {
    #[error("token required")]
    TokenRequired,
    #[error("invalid token")]
    TokenInvalid,
    #[error("token has expired")]
    TokenExpired,
    #[error("token invalid")]
    SessionMismatch,
    #[error("session lookup failed: {0}")]
    SessionUnavailable(String),
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("{0} not found")]
    NotFound(ResourceKind),
    #[error("{0} already registered")]
    AlreadyExists(ResourceKind),
    #[error("{0}")]
    Validation(ValidationError),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("failed to hash password")]
    PasswordHashError,
    #[error("database error: {0}")]
    Database(String),
    #[error("cache {0} failed: {1}")]
    Cache(CacheOp, String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<ValidationError> for BlogError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<serde_json::Error> for BlogError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl BlogError {
    /// True for authentication failures that must surface as 401.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::TokenRequired
                | Self::TokenInvalid
                | Self::TokenExpired
                | Self::SessionMismatch
                | Self::SessionUnavailable(_)
                | Self::InvalidCredentials
        )
    }
}
