//! Registry error taxonomy

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Which kind of registry entity an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
    Certificate,
    Tag,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Certificate => f.write_str("certificate"),
            Entity::Tag => f.write_str("tag"),
        }
    }
}

impl Entity {
    /// Type name used when rendering validation keys
    pub fn type_name(&self) -> &'static str {
        match self {
            Entity::Certificate => "Certificate",
            Entity::Tag => "Tag",
        }
    }
}

/// Closed error union surfaced by every registry operation
///
/// The four kinds are stable; front ends dispatch on them (or on
/// [`RegistryError::code`]) to pick their own transport-level status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Entity absent or soft-deleted at lookup time
    #[error("{entity} not found: {key}")]
    NotFound { entity: Entity, key: String },

    /// A live row already owns the natural key; `id` points at it
    #[error("{entity} already exists: id={id}")]
    AlreadyExists { entity: Entity, id: Uuid },

    /// One or more field violations, newline-joined
    #[error("validation failed: {0}")]
    Validation(String),

    /// Opaque failure from the storage collaborator
    #[error("storage error: {0}")]
    Storage(String),
}

impl RegistryError {
    pub fn not_found(entity: Entity, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }

    pub fn already_exists(entity: Entity, id: Uuid) -> Self {
        Self::AlreadyExists { entity, id }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Map to the wire-level error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound {
                entity: Entity::Certificate,
                ..
            } => ErrorCode::CertificateNotFound,
            Self::NotFound {
                entity: Entity::Tag,
                ..
            } => ErrorCode::TagNotFound,
            Self::AlreadyExists {
                entity: Entity::Certificate,
                ..
            } => ErrorCode::CertificateAlreadyExists,
            Self::AlreadyExists {
                entity: Entity::Tag,
                ..
            } => ErrorCode::TagAlreadyExists,
            Self::Validation(_) => ErrorCode::ValidationFailed,
            Self::Storage(_) => ErrorCode::DatabaseError,
        }
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code().http_status()
    }
}

impl From<certmgr_x509::CertError> for RegistryError {
    fn from(err: certmgr_x509::CertError) -> Self {
        Self::Validation(format!("Invalid PEM: {err}"))
    }
}

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;
