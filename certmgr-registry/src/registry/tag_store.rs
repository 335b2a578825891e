//! Tag Store

use super::association;
use super::entity_error;
use super::outcome::CreateOutcome;
use crate::db::DbService;
use crate::db::repository::{RepoError, certificate_tag, tag};
use shared::error::{Entity, RegistryError, RegistryResult};
use shared::models::{Tag, TagCreate, TagUpdate, TagWithCertificates};
use shared::validation;
use sqlx::SqlitePool;
use uuid::Uuid;

#[derive(Clone)]
pub struct TagStore {
    pool: SqlitePool,
}

impl TagStore {
    pub fn new(db: &DbService) -> Self {
        Self {
            pool: db.pool.clone(),
        }
    }

    pub async fn create(&self, name: &str) -> RegistryResult<CreateOutcome<Tag>> {
        self.create_from(TagCreate::new(name)).await
    }

    pub async fn create_with_description(
        &self,
        name: &str,
        description: &str,
    ) -> RegistryResult<CreateOutcome<Tag>> {
        self.create_from(TagCreate::new(name).with_description(description))
            .await
    }

    /// Validate and insert; a live tag with the same name is returned instead
    pub async fn create_from(&self, data: TagCreate) -> RegistryResult<CreateOutcome<Tag>> {
        tracing::debug!(name = %data.name, "Creating tag");
        validation::ensure_valid(&data)?;

        if let Some(existing) = tag::find_by_name(&self.pool, &data.name).await? {
            tracing::debug!(id = %existing.id, name = %existing.name, "Tag already exists");
            return Ok(CreateOutcome::AlreadyExists(existing));
        }

        let name = data.name.clone();
        match tag::create(&self.pool, data).await {
            Ok(created) => {
                tracing::debug!(id = %created.id, name = %created.name, "Tag created");
                Ok(CreateOutcome::Created(created))
            }
            Err(RepoError::Duplicate(_)) => {
                tracing::warn!(name = %name, "Concurrent creation of the same tag, returning existing row");
                let existing = tag::find_by_name(&self.pool, &name).await?.ok_or_else(|| {
                    RegistryError::storage(format!("tag {name} vanished after uniqueness conflict"))
                })?;
                Ok(CreateOutcome::AlreadyExists(existing))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Tag with its live certificates
    pub async fn get_by_name(&self, name: &str) -> RegistryResult<TagWithCertificates> {
        tracing::debug!(name = %name, "Getting tag");
        let found = self.lookup_by_name(name).await?;
        self.with_certificates(found).await
    }

    /// Tag with its live certificates
    pub async fn get_by_id(&self, id: Uuid) -> RegistryResult<TagWithCertificates> {
        tracing::debug!(id = %id, "Getting tag");
        let found = self.find_by_id(id).await?;
        self.with_certificates(found).await
    }

    /// Name lookup without loading certificates
    pub async fn lookup_by_name(&self, name: &str) -> RegistryResult<Tag> {
        association::lookup_tag(&self.pool, name).await
    }

    /// All live tags, certificates not loaded
    pub async fn list(&self) -> RegistryResult<Vec<Tag>> {
        tracing::debug!("Listing tags");
        Ok(tag::find_all(&self.pool).await?)
    }

    /// Replace the description; an empty string clears it
    pub async fn set_description_by_id(&self, id: Uuid, description: &str) -> RegistryResult<Tag> {
        tracing::debug!(id = %id, description = %description, "Setting tag description");

        let update = TagUpdate {
            description: (!description.is_empty()).then(|| description.to_string()),
        };
        validation::ensure_valid(&update)?;

        self.find_by_id(id).await?;
        tag::update_description(&self.pool, id, update.description.as_deref())
            .await
            .map_err(|e| entity_error(e, Entity::Tag, id))
    }

    /// Soft delete; links stay until purge
    pub async fn delete_by_id(&self, id: Uuid) -> RegistryResult<()> {
        tracing::debug!(id = %id, "Deleting tag");
        tag::soft_delete(&self.pool, id)
            .await
            .map_err(|e| entity_error(e, Entity::Tag, id))
    }

    /// Permanently remove every soft-deleted tag
    ///
    /// Same sweep as for certificates: clear links, remove the row, stop at
    /// the first failure.
    pub async fn purge_pending_records(&self) -> RegistryResult<usize> {
        let pending = tag::find_deleted(&self.pool).await?;
        tracing::debug!(pending = pending.len(), "Purging deleted tags");

        let mut purged = 0;
        for t in &pending {
            match association::purge_tag(&self.pool, t.id).await {
                Ok(cleared) => {
                    tracing::debug!(id = %t.id, name = %t.name, cleared, "Tag purged");
                    purged += 1;
                }
                Err(e) => {
                    tracing::error!(id = %t.id, error = %e, "Tag purge aborted");
                    return Err(e);
                }
            }
        }

        tracing::info!(purged, "Purged deleted tags");
        Ok(purged)
    }

    async fn find_by_id(&self, id: Uuid) -> RegistryResult<Tag> {
        tag::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| RegistryError::not_found(Entity::Tag, id.to_string()))
    }

    async fn with_certificates(&self, found: Tag) -> RegistryResult<TagWithCertificates> {
        let certificates = certificate_tag::find_certificates_by_tag(&self.pool, found.id).await?;
        Ok(TagWithCertificates {
            tag: found,
            certificates,
        })
    }
}
