//! Error types for Tickler.
//!
//! Collection and persistence operations never fail from the caller's point
//! of view; the errors here cover configuration, storage backends, input
//! validation and import/export files.

use thiserror::Error;

use crate::config::ConfigError;
use crate::storage::StorageError;
use crate::types::ParseKindError;
use crate::validation::ValidationError;

/// The crate-wide error type.
///
/// # Examples
///
/// ```
/// use tickler_core::error::{Result, TicklerError};
/// use tickler_core::types::Todo;
///
/// fn parse(json: &str) -> Result<Vec<Todo>> {
///     Ok(serde_json::from_str(json)?)
/// }
///
/// assert!(matches!(parse("oops"), Err(TicklerError::Json(_))));
/// ```
#[derive(Error, Debug)]
pub enum TicklerError {
    /// Configuration-related error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Key-value store error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// User input rejected by validation.
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Unknown filter, sort or theme literal.
    #[error("{0}")]
    Parse(#[from] ParseKindError),
}

/// A specialized `Result` type for Tickler operations.
pub type Result<T> = std::result::Result<T, TicklerError>;
