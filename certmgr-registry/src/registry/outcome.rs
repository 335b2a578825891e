//! Result of an idempotent create

use shared::error::{Entity, RegistryError, RegistryResult};
use shared::models::{Certificate, Tag};
use uuid::Uuid;

/// A record returned by create, tagged with whether it was newly written
///
/// `AlreadyExists` carries the live row that already owns the natural key;
/// callers may treat it as a soft success or turn it into an error with
/// [`CreateOutcome::into_result`].
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome<T> {
    Created(T),
    AlreadyExists(T),
}

/// Records that can be reported in an `AlreadyExists` error
pub trait Identified {
    const ENTITY: Entity;
    fn id(&self) -> Uuid;
}

impl Identified for Certificate {
    const ENTITY: Entity = Entity::Certificate;
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Identified for Tag {
    const ENTITY: Entity = Entity::Tag;
    fn id(&self) -> Uuid {
        self.id
    }
}

impl<T> CreateOutcome<T> {
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists(_))
    }

    pub fn as_inner(&self) -> &T {
        match self {
            Self::Created(v) | Self::AlreadyExists(v) => v,
        }
    }

    /// The record, whichever way it was obtained
    pub fn into_inner(self) -> T {
        match self {
            Self::Created(v) | Self::AlreadyExists(v) => v,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> CreateOutcome<U> {
        match self {
            Self::Created(v) => CreateOutcome::Created(f(v)),
            Self::AlreadyExists(v) => CreateOutcome::AlreadyExists(f(v)),
        }
    }
}

impl<T: Identified> CreateOutcome<T> {
    /// `AlreadyExists` becomes [`RegistryError::AlreadyExists`] with the existing id
    pub fn into_result(self) -> RegistryResult<T> {
        match self {
            Self::Created(v) => Ok(v),
            Self::AlreadyExists(v) => Err(RegistryError::already_exists(T::ENTITY, v.id())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(name: &str) -> Tag {
        Tag {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            created_at: 0,
            updated_at: 0,
            deleted_at: None,
        }
    }

    #[test]
    fn test_into_result_carries_existing_id() {
        let existing = tag("prod");
        let id = existing.id;
        let err = CreateOutcome::AlreadyExists(existing).into_result().unwrap_err();
        assert_eq!(err, RegistryError::already_exists(Entity::Tag, id));
    }

    #[test]
    fn test_into_inner_either_way() {
        let created = CreateOutcome::Created(tag("a"));
        assert!(created.is_created());
        assert_eq!(created.into_inner().name, "a");

        let found = CreateOutcome::AlreadyExists(tag("b"));
        assert!(found.is_already_exists());
        assert_eq!(found.map(|t| t.name).into_inner(), "b");
    }
}
