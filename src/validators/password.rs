use super::ValidationError;

const MIN_LENGTH: usize = 8;
const MAX_LENGTH: usize = 128;

/// Validates a new password. Login does not run this: existing accounts keep
/// whatever password they were created with.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::PasswordEmpty);
    }

    let len = password.chars().count();
    if len < MIN_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }
    if len > MAX_LENGTH {
        return Err(ValidationError::PasswordTooLong);
    }

    Ok(())
}
