//! Signed session tokens.
//!
//! Tokens are HS256 JWTs carrying the user id. Signature and expiry alone do
//! not authorize a request; the [`gate`](crate::gate) also requires the token
//! to be the one currently held in the session store.
//!
//! ```rust
//! use blogkit::jwt::{JwtConfig, JwtService};
//!
//! let service = JwtService::new(JwtConfig::new("a-long-and-random-signing-secret!").unwrap());
//! let issued = service.issue(7).unwrap();
//! assert_eq!(service.verify(&issued.token).unwrap().id, 7);
//! ```

mod claims;
mod config;
mod service;

pub use claims::SessionClaims;
pub use config::{DEFAULT_ISSUER, JwtConfig, RECOMMENDED_SECRET_LENGTH};
pub use service::{IssuedToken, JwtService};
