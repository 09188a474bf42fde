use chrono::Duration;
use std::fmt;

use crate::{BlogError, SecretString};

/// Secrets shorter than this are accepted but logged at startup.
pub const RECOMMENDED_SECRET_LENGTH: usize = 32;

/// Default issuer label written into `iss`.
pub const DEFAULT_ISSUER: &str = "blogkit";

/// Configuration for session token signing and validation.
#[derive(Clone)]
pub struct JwtConfig {
    /// HS256 signing key.
    pub(crate) secret: SecretString,
    /// Token lifetime. Default: 24 hours.
    pub(crate) expiry: Duration,
    pub(crate) issuer: String,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("expiry", &self.expiry)
            .field("issuer", &self.issuer)
            .finish()
    }
}

impl JwtConfig {
    /// Creates a configuration from the process-wide signing secret.
    ///
    /// # Errors
    /// Returns `BlogError::Configuration` if the secret is empty. An empty key
    /// would let anyone mint tokens that verify.
    pub fn new(secret: impl Into<SecretString>) -> Result<Self, BlogError> {
        let secret = secret.into();

        if secret.is_empty() {
            return Err(BlogError::Configuration(
                "JWT signing secret must not be empty".to_owned(),
            ));
        }

        if secret.len() < RECOMMENDED_SECRET_LENGTH {
            tracing::warn!(
                len = secret.len(),
                recommended = RECOMMENDED_SECRET_LENGTH,
                "JWT signing secret is shorter than recommended"
            );
        }

        Ok(Self {
            secret,
            expiry: Duration::hours(24),
            issuer: DEFAULT_ISSUER.to_owned(),
        })
    }

    #[must_use]
    pub fn with_expiry(mut self, expiry: Duration) -> Self {
        self.expiry = expiry;
        self
    }

    #[must_use]
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    pub fn expiry(&self) -> Duration {
        self.expiry
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }
}
