//! Runtime configuration for the blog service.
//!
//! Values come from the process environment (optionally seeded from a `.env`
//! file). Everything has a default except the token signing key.
//!
//! # Example
//!
//! ```rust
//! use blogkit::config::BlogConfig;
//!
//! let config = BlogConfig::from_lookup(|key| match key {
//!     "JWT_SIGNING_KEY" => Some("a-long-and-random-signing-secret!".to_owned()),
//!     "APP_SERVER_PORT" => Some(":9000".to_owned()),
//!     _ => None,
//! })
//! .unwrap();
//!
//! assert_eq!(config.server.listen_addr, "0.0.0.0:9000");
//! assert_eq!(config.cache.ttl.as_secs(), 3600);
//! ```

use std::time::Duration as StdDuration;

use chrono::Duration;

use crate::jwt::{DEFAULT_ISSUER, JwtConfig};
use crate::{BlogError, SecretString};

/// Main configuration struct of the service.
#[derive(Debug, Clone)]
pub struct BlogConfig {
    pub tokens: TokenConfig,
    pub cache: CacheConfig,
    pub server: ServerConfig,
    pub database_url: String,
    pub redis_url: String,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            tokens: TokenConfig::default(),
            cache: CacheConfig::default(),
            server: ServerConfig::default(),
            database_url: "postgres://postgres@localhost:5432/blog?sslmode=disable".to_owned(),
            redis_url: "redis://localhost:6379/0".to_owned(),
        }
    }
}

/// Session token settings.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// HS256 key shared by every instance. Required.
    pub signing_key: SecretString,
    pub issuer: String,
    /// Lifetime of both the token and its session entry.
    ///
    /// Default: 24 hours
    pub session_ttl: Duration,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            signing_key: SecretString::new(""),
            issuer: DEFAULT_ISSUER.to_owned(),
            session_ttl: Duration::hours(24),
        }
    }
}

impl TokenConfig {
    /// # Errors
    /// Returns `BlogError::Configuration` when the signing key is empty.
    pub fn jwt_config(&self) -> Result<JwtConfig, BlogError> {
        Ok(JwtConfig::new(self.signing_key.clone())?
            .with_expiry(self.session_ttl)
            .with_issuer(self.issuer.clone()))
    }
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Default: 1 hour
    pub ttl: StdDuration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: crate::cache::DEFAULT_TTL,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `host:port` to bind.
    pub listen_addr: String,
    pub request_timeout: StdDuration,
    /// Empty means any origin.
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_owned(),
            request_timeout: StdDuration::from_secs(30),
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl BlogConfig {
    /// Local defaults with a fixed, non-secret signing key.
    pub fn development() -> Self {
        Self {
            tokens: TokenConfig {
                signing_key: SecretString::new("development-signing-key-change-me!"),
                ..TokenConfig::default()
            },
            server: ServerConfig {
                listen_addr: "127.0.0.1:8080".to_owned(),
                ..ServerConfig::default()
            },
            ..Self::default()
        }
    }

    /// Reads the process environment, after loading `.env` if present.
    ///
    /// # Errors
    /// Returns `BlogError::Configuration` when `JWT_SIGNING_KEY` is missing, a
    /// numeric variable does not parse, or a TTL is not positive.
    pub fn from_env() -> Result<Self, BlogError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(BlogError::Configuration(format!("failed to read .env: {e}")));
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Empty values count as
    /// unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BlogError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let signing_key = var("JWT_SIGNING_KEY").ok_or_else(|| {
            BlogError::Configuration("JWT_SIGNING_KEY must be set".to_owned())
        })?;

        let tokens = TokenConfig {
            signing_key: SecretString::new(signing_key),
            issuer: var("JWT_ISSUER").unwrap_or(defaults.tokens.issuer),
            session_ttl: match parse::<i64>(&var, "SESSION_TTL_HOURS")? {
                Some(hours) => session_ttl(hours)?,
                None => defaults.tokens.session_ttl,
            },
        };

        let cache = CacheConfig {
            ttl: match parse::<u64>(&var, "CACHE_TTL_SECONDS")? {
                Some(0) => {
                    return Err(BlogError::Configuration(
                        "CACHE_TTL_SECONDS must be positive".to_owned(),
                    ));
                }
                Some(seconds) => StdDuration::from_secs(seconds),
                None => defaults.cache.ttl,
            },
        };

        let server = ServerConfig {
            listen_addr: var("APP_SERVER_PORT")
                .map_or(defaults.server.listen_addr, |addr| listen_addr(&addr)),
            request_timeout: parse::<u64>(&var, "REQUEST_TIMEOUT_SECONDS")?
                .map_or(defaults.server.request_timeout, StdDuration::from_secs),
            cors_allowed_origins: var("CORS_ALLOWED_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(str::trim)
                        .filter(|origin| !origin.is_empty())
                        .map(str::to_owned)
                        .collect()
                })
                .unwrap_or_default(),
        };

        let database_url = var("DATABASE_URL").unwrap_or_else(|| postgres_url(&var));
        let redis_url = var("REDIS_URL").unwrap_or_else(|| redis_url(&var));

        Ok(Self {
            tokens,
            cache,
            server,
            database_url,
            redis_url,
        })
    }
}

fn parse<T>(var: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>, BlogError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    var(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| BlogError::Configuration(format!("{key}: {e}")))
        })
        .transpose()
}

/// Tokens expire at `now + ttl`, so the sum has to stay representable.
fn session_ttl(hours: i64) -> Result<Duration, BlogError> {
    Duration::try_hours(hours)
        .filter(|ttl| *ttl > Duration::zero())
        .filter(|ttl| chrono::Utc::now().checked_add_signed(*ttl).is_some())
        .ok_or_else(|| {
            BlogError::Configuration(format!("SESSION_TTL_HOURS out of range: {hours}"))
        })
}

/// `:8080` binds every interface.
fn listen_addr(raw: &str) -> String {
    let raw = raw.trim();
    match raw.strip_prefix(':') {
        Some(port) => format!("0.0.0.0:{port}"),
        None => raw.to_owned(),
    }
}

/// Userinfo part of a connection URL, percent-encoded.
fn credentials(user: Option<String>, pass: Option<String>) -> String {
    let user = user.map(|user| urlencoding::encode(&user).into_owned());
    let pass = pass.map(|pass| urlencoding::encode(&pass).into_owned());
    match (user, pass) {
        (Some(user), Some(pass)) => format!("{user}:{pass}@"),
        (Some(user), None) => format!("{user}@"),
        (None, Some(pass)) => format!(":{pass}@"),
        (None, None) => String::new(),
    }
}

fn postgres_url(var: &impl Fn(&str) -> Option<String>) -> String {
    format!(
        "postgres://{}{}:{}/{}?sslmode={}",
        credentials(
            Some(var("POSTGRES_DB_USER").unwrap_or_else(|| "postgres".to_owned())),
            var("POSTGRES_DB_PASS"),
        ),
        var("POSTGRES_DB_HOST").unwrap_or_else(|| "localhost".to_owned()),
        var("POSTGRES_DB_PORT").unwrap_or_else(|| "5432".to_owned()),
        var("POSTGRES_DB_NAME").unwrap_or_else(|| "blog".to_owned()),
        var("POSTGRES_DB_SSL_MODE").unwrap_or_else(|| "disable".to_owned()),
    )
}

fn redis_url(var: &impl Fn(&str) -> Option<String>) -> String {
    format!(
        "redis://{}{}:{}/{}",
        credentials(var("REDIS_USER"), var("REDIS_PASSWORD")),
        var("REDIS_HOST").unwrap_or_else(|| "localhost".to_owned()),
        var("REDIS_PORT").unwrap_or_else(|| "6379".to_owned()),
        var("REDIS_DB").unwrap_or_else(|| "0".to_owned()),
    )
}
