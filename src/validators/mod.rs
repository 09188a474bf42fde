//! Input validation for request bodies.

mod article;
mod email;
mod name;
mod password;

pub use article::{normalize_tags, validate_content, validate_title};
pub use email::validate_email;
pub use name::validate_name;
pub use password::validate_password;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum ValidationError {
    #[error("Email cannot be empty")]
    EmailEmpty,
    #[error("Email is too long (max 254 characters)")]
    EmailTooLong,
    #[error("Invalid email format")]
    EmailInvalidFormat,
    #[error("Password cannot be empty")]
    PasswordEmpty,
    #[error("Password must be at least 8 characters")]
    PasswordTooShort,
    #[error("Password is too long (max 128 characters)")]
    PasswordTooLong,
    #[error("Name cannot be empty")]
    NameEmpty,
    #[error("Name is too long (max 100 characters)")]
    NameTooLong,
    #[error("Title cannot be empty")]
    TitleEmpty,
    #[error("Title is too long (max 255 characters)")]
    TitleTooLong,
    #[error("Content cannot be empty")]
    ContentEmpty,
}
