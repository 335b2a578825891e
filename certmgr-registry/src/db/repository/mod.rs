//! Repository Module
//!
//! Free async functions over `&SqlitePool`, one module per table.
//! Lookups only see live rows unless the function name says otherwise.

pub mod certificate;
pub mod certificate_tag;
pub mod tag;

use shared::error::RegistryError;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepoError::Duplicate(db.message().to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

/// Fallback mapping; stores translate `NotFound`/`Duplicate` themselves
/// where they know which entity and key were involved.
impl From<RepoError> for RegistryError {
    fn from(err: RepoError) -> Self {
        RegistryError::storage(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
