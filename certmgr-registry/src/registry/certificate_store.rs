//! Certificate Store
//!
//! Certificates are content-addressed: the SHA-256 fingerprint of the DER
//! bytes is the natural key, so registering the same PEM twice hands back
//! the row that is already there.

use super::association::{self, TagSetChange};
use super::outcome::CreateOutcome;
use super::{entity_error, names_for_log};
use crate::db::DbService;
use crate::db::repository::{RepoError, certificate, certificate_tag};
use shared::error::{Entity, RegistryError, RegistryResult};
use shared::fingerprint::normalize_fingerprint;
use shared::models::{Certificate, CertificateCreate};
use shared::validation;
use sqlx::SqlitePool;
use uuid::Uuid;

#[derive(Clone)]
pub struct CertificateStore {
    pool: SqlitePool,
}

impl CertificateStore {
    pub fn new(db: &DbService) -> Self {
        Self {
            pool: db.pool.clone(),
        }
    }

    /// Parse, validate and register a PEM certificate
    pub async fn create(&self, pem: &str) -> RegistryResult<CreateOutcome<Certificate>> {
        tracing::debug!("Creating certificate");

        let data = CertificateCreate::from(certmgr_x509::parse(pem)?);
        validation::ensure_valid(&data)?;

        if let Some(existing) = self.find_live_by_fingerprint(&data.fingerprint).await? {
            tracing::debug!(id = %existing.id, fingerprint = %existing.fingerprint, "Certificate already registered");
            return Ok(CreateOutcome::AlreadyExists(existing));
        }

        let fingerprint = data.fingerprint.clone();
        match certificate::create(&self.pool, data).await {
            Ok(cert) => {
                tracing::debug!(id = %cert.id, fingerprint = %cert.fingerprint, "Certificate created");
                Ok(CreateOutcome::Created(cert))
            }
            Err(RepoError::Duplicate(_)) => {
                tracing::warn!(
                    fingerprint = %fingerprint,
                    "Concurrent registration of the same certificate, returning existing row"
                );
                let existing = self
                    .find_live_by_fingerprint(&fingerprint)
                    .await?
                    .ok_or_else(|| {
                        RegistryError::storage(format!(
                            "certificate {fingerprint} vanished after uniqueness conflict"
                        ))
                    })?;
                Ok(CreateOutcome::AlreadyExists(existing))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Register a certificate, then attach the named tags
    ///
    /// A fresh certificate stays registered (untagged) when a tag name does
    /// not resolve. An already registered certificate is returned as is.
    pub async fn create_with_tags<S: AsRef<str>>(
        &self,
        pem: &str,
        tag_names: &[S],
    ) -> RegistryResult<CreateOutcome<Certificate>> {
        tracing::debug!(tags = ?names_for_log(tag_names), "Creating certificate with tags");

        match self.create(pem).await? {
            CreateOutcome::Created(cert) => {
                let tagged = self.set_tags_by_id(cert.id, tag_names).await?;
                Ok(CreateOutcome::Created(tagged))
            }
            existing @ CreateOutcome::AlreadyExists(_) => Ok(existing),
        }
    }

    pub async fn get_by_id(&self, id: Uuid) -> RegistryResult<Certificate> {
        tracing::debug!(id = %id, "Getting certificate");
        let cert = certificate::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| RegistryError::not_found(Entity::Certificate, id.to_string()))?;
        self.with_tags(cert).await
    }

    /// Accepts `AB:CD:...` and mixed case as well as the stored form
    pub async fn get_by_fingerprint(&self, fingerprint: &str) -> RegistryResult<Certificate> {
        tracing::debug!(fingerprint = %fingerprint, "Getting certificate by fingerprint");
        let normalized = normalize_fingerprint(fingerprint)?;
        let found = self.find_live_by_fingerprint(&normalized).await?;
        found.ok_or_else(|| RegistryError::not_found(Entity::Certificate, normalized))
    }

    /// All live certificates with their tags
    pub async fn list(&self) -> RegistryResult<Vec<Certificate>> {
        tracing::debug!("Listing certificates");
        let certs = certificate::find_all(&self.pool).await?;
        let mut out = Vec::with_capacity(certs.len());
        for cert in certs {
            out.push(self.with_tags(cert).await?);
        }
        Ok(out)
    }

    /// Add tags to a certificate; existing tags are kept
    pub async fn set_tags_by_id<S: AsRef<str>>(
        &self,
        id: Uuid,
        tag_names: &[S],
    ) -> RegistryResult<Certificate> {
        tracing::debug!(id = %id, tags = ?names_for_log(tag_names), "Setting certificate tags");
        self.change_tags(id, tag_names, TagSetChange::Union).await
    }

    pub async fn set_tag_by_id(&self, id: Uuid, tag_name: &str) -> RegistryResult<Certificate> {
        self.set_tags_by_id(id, &[tag_name]).await
    }

    /// Remove exactly the named tags from a certificate
    pub async fn delete_tags_by_id<S: AsRef<str>>(
        &self,
        id: Uuid,
        tag_names: &[S],
    ) -> RegistryResult<Certificate> {
        tracing::debug!(id = %id, tags = ?names_for_log(tag_names), "Removing certificate tags");
        self.change_tags(id, tag_names, TagSetChange::Difference).await
    }

    /// Soft delete; links stay until purge
    pub async fn delete_by_id(&self, id: Uuid) -> RegistryResult<()> {
        tracing::debug!(id = %id, "Deleting certificate");
        certificate::soft_delete(&self.pool, id)
            .await
            .map_err(|e| entity_error(e, Entity::Certificate, id))
    }

    /// Permanently remove every soft-deleted certificate
    ///
    /// Rows are purged one at a time; the first failure stops the sweep and
    /// rows already purged stay purged.
    pub async fn purge_pending_records(&self) -> RegistryResult<usize> {
        let pending = certificate::find_deleted(&self.pool).await?;
        tracing::debug!(pending = pending.len(), "Purging deleted certificates");

        let mut purged = 0;
        for cert in &pending {
            match association::purge_certificate(&self.pool, cert.id).await {
                Ok(cleared) => {
                    tracing::debug!(id = %cert.id, cleared, "Certificate purged");
                    purged += 1;
                }
                Err(e) => {
                    tracing::error!(id = %cert.id, error = %e, "Certificate purge aborted");
                    return Err(e);
                }
            }
        }

        tracing::info!(purged, "Purged deleted certificates");
        Ok(purged)
    }

    async fn change_tags<S: AsRef<str>>(
        &self,
        id: Uuid,
        tag_names: &[S],
        change: TagSetChange,
    ) -> RegistryResult<Certificate> {
        certificate::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| RegistryError::not_found(Entity::Certificate, id.to_string()))?;
        let tags = association::resolve_tags(&self.pool, tag_names).await?;
        association::apply(&self.pool, id, change, &tags).await?;
        self.get_by_id(id).await
    }

    async fn find_live_by_fingerprint(
        &self,
        fingerprint: &str,
    ) -> RegistryResult<Option<Certificate>> {
        match certificate::find_by_fingerprint(&self.pool, fingerprint).await? {
            Some(cert) => Ok(Some(self.with_tags(cert).await?)),
            None => Ok(None),
        }
    }

    async fn with_tags(&self, mut cert: Certificate) -> RegistryResult<Certificate> {
        cert.tags = certificate_tag::find_tags_by_certificate(&self.pool, cert.id).await?;
        Ok(cert)
    }
}
