use super::ValidationError;

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    let trimmed = title.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::TitleEmpty);
    }

    if trimmed.chars().count() > 255 {
        return Err(ValidationError::TitleTooLong);
    }

    Ok(())
}

pub fn validate_content(content: &str) -> Result<(), ValidationError> {
    if content.trim().is_empty() {
        return Err(ValidationError::ContentEmpty);
    }
    Ok(())
}

/// Lower-cases tags and strips every space: `"Rust, Web Dev"` becomes
/// `"rust,webdev"`.
pub fn normalize_tags(tags: &str) -> String {
    tags.to_lowercase().replace(' ', "")
}
