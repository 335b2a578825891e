//! Tag Model

use super::certificate::Certificate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Tag entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Tag {
    pub id: Uuid,
    /// Unique among live tags, never contains whitespace
    pub name: String,
    pub description: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

impl Tag {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Tag with its live certificates preloaded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagWithCertificates {
    #[serde(flatten)]
    pub tag: Tag,
    pub certificates: Vec<Certificate>,
}

/// Create tag payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TagCreate {
    #[validate(
        length(
            min = 1,
            max = 50,
            message = "name must be between 1 and 50 characters"
        ),
        custom(function = "crate::validation::validate_no_whitespace")
    )]
    pub name: String,
    #[validate(length(
        max = 100,
        message = "description must be at most 100 characters"
    ))]
    pub description: Option<String>,
}

impl TagCreate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Update tag payload (only the description is mutable)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TagUpdate {
    #[validate(length(
        max = 100,
        message = "description must be at most 100 characters"
    ))]
    pub description: Option<String>,
}
