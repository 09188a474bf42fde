use std::sync::{Arc, OnceLock};

use argon2::{Algorithm, Argon2, Params, PasswordVerifier, Version};
use password_hash::{PasswordHash, PasswordHasher as ArgonPasswordHasher, SaltString};
use rand::rngs::OsRng;

use crate::{BlogError, SecretString};

/// Trait for password hashing and verification.
///
/// The default implementation is [`Argon2Hasher`].
///
/// ```rust
/// use blogkit::crypto::{Argon2Hasher, PasswordHasher};
///
/// let hasher = Argon2Hasher::default();
/// let hash = hasher.hash("p").unwrap();
/// assert!(hasher.verify("p", &hash).unwrap());
/// assert!(!hasher.verify("wrong", &hash).unwrap());
/// ```
pub trait PasswordHasher: Send + Sync {
    /// Hash a password with a fresh random salt.
    ///
    /// # Errors
    ///
    /// Returns `BlogError::PasswordHashError` if hashing fails.
    fn hash(&self, password: &str) -> Result<String, BlogError>;

    /// Verify a password against a stored hash.
    ///
    /// A mismatch is `Ok(false)`; only a malformed stored hash is an error.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, BlogError>;

    /// A hash of a throwaway password made with this hasher's parameters.
    ///
    /// Login verifies against it when the email is unknown, so that path
    /// costs as much as a wrong password for a real account.
    fn dummy_hash(&self) -> Result<String, BlogError> {
        self.hash(DUMMY_PASSWORD)
    }
}

const DUMMY_PASSWORD: &str = "blogkit-dummy-password";

/// Argon2id password hasher with a fixed work factor.
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    /// Memory cost in KiB
    memory_cost: u32,
    /// Number of iterations
    time_cost: u32,
    parallelism: u32,
    /// Shared by clones, computed on first use
    dummy: Arc<OnceLock<String>>,
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        // 19 MiB - argon2 default
        Self::new(19456, 2, 1)
    }
}

impl Argon2Hasher {
    #[must_use]
    pub fn new(memory_cost: u32, time_cost: u32, parallelism: u32) -> Self {
        Self {
            memory_cost,
            time_cost,
            parallelism,
            dummy: Arc::new(OnceLock::new()),
        }
    }

    /// 64 MiB, 3 iterations, 4 lanes.
    #[must_use]
    pub fn production() -> Self {
        Self::new(65536, 3, 4)
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, BlogError> {
        let salt = SaltString::generate(&mut OsRng);
        let params = Params::new(self.memory_cost, self.time_cost, self.parallelism, None)
            .map_err(|_| BlogError::PasswordHashError)?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|_| BlogError::PasswordHashError)
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, BlogError> {
        let parsed = PasswordHash::new(hash).map_err(|_| BlogError::PasswordHashError)?;

        // parameters come from the PHC string, not from self
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    fn dummy_hash(&self) -> Result<String, BlogError> {
        if let Some(hash) = self.dummy.get() {
            return Ok(hash.clone());
        }
        let hash = self.hash(DUMMY_PASSWORD)?;
        Ok(self.dummy.get_or_init(|| hash).clone())
    }
}

/// Hashes on the blocking pool so the runtime keeps serving other requests.
pub async fn hash_password<H>(hasher: &H, password: &SecretString) -> Result<String, BlogError>
where
    H: PasswordHasher + Clone + 'static,
{
    let hasher = hasher.clone();
    let password = password.clone();
    tokio::task::spawn_blocking(move || hasher.hash(password.expose_secret()))
        .await
        .map_err(|_| BlogError::PasswordHashError)?
}

/// Blocking-pool counterpart of [`PasswordHasher::verify`].
pub async fn verify_password<H>(
    hasher: &H,
    password: &SecretString,
    hash: &str,
) -> Result<bool, BlogError>
where
    H: PasswordHasher + Clone + 'static,
{
    let hasher = hasher.clone();
    let password = password.clone();
    let hash = hash.to_owned();
    tokio::task::spawn_blocking(move || hasher.verify(password.expose_secret(), &hash))
        .await
        .map_err(|_| BlogError::PasswordHashError)?
}

/// Verifies `password` against [`PasswordHasher::dummy_hash`] on the blocking
/// pool and discards the outcome.
pub async fn verify_dummy<H>(hasher: &H, password: &SecretString) -> Result<(), BlogError>
where
    H: PasswordHasher + Clone + 'static,
{
    let hasher = hasher.clone();
    let password = password.clone();
    tokio::task::spawn_blocking(move || {
        let hash = hasher.dummy_hash()?;
        hasher.verify(password.expose_secret(), &hash).map(|_| ())
    })
    .await
    .map_err(|_| BlogError::PasswordHashError)?
}
