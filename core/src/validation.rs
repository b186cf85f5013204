//! Input validation for todo fields.
//!
//! The collection manager stores whatever it is given; callers that collect
//! user input run these checks first. Lengths are counted in characters.

use thiserror::Error;

/// Maximum title length in characters (after trimming).
pub const MAX_TITLE_LENGTH: usize = 120;

/// Maximum notes length in characters.
pub const MAX_NOTES_LENGTH: usize = 500;

/// Reasons a todo field is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Title is empty or whitespace only.
    #[error("title is required")]
    EmptyTitle,

    #[error("title too long ({length}/120 characters)")]
    TitleTooLong { length: usize },

    #[error("notes too long ({length}/500 characters)")]
    NotesTooLong { length: usize },
}

/// Validates a todo title.
///
/// # Errors
///
/// Returns `ValidationError` if the trimmed title is empty or longer than
/// [`MAX_TITLE_LENGTH`].
///
/// # Examples
///
/// ```
/// use tickler_core::validation::{validate_title, ValidationError};
///
/// assert!(validate_title("Buy milk").is_ok());
/// assert_eq!(validate_title("   "), Err(ValidationError::EmptyTitle));
/// ```
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    let trimmed = title.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }

    let length = trimmed.chars().count();
    if length > MAX_TITLE_LENGTH {
        return Err(ValidationError::TitleTooLong { length });
    }

    Ok(())
}

/// Validates todo notes. Empty notes are fine.
///
/// # Errors
///
/// Returns `ValidationError::NotesTooLong` past [`MAX_NOTES_LENGTH`].
pub fn validate_notes(notes: &str) -> Result<(), ValidationError> {
    let length = notes.chars().count();
    if length > MAX_NOTES_LENGTH {
        return Err(ValidationError::NotesTooLong { length });
    }

    Ok(())
}
