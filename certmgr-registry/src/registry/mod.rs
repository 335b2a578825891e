//! Certificate/tag registry
//!
//! - [`CertificateStore`]: content-addressed certificates and their tag sets
//! - [`TagStore`]: tags and their lifecycle
//! - [`Registry`]: both stores over one database, plus the combined purge

mod association;
mod certificate_store;
mod outcome;
mod tag_store;

pub use association::TagSetChange;
pub use certificate_store::CertificateStore;
pub use outcome::{CreateOutcome, Identified};
pub use tag_store::TagStore;

use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::RepoError;
use shared::error::{Entity, RegistryError, RegistryResult};
use sqlx::SqlitePool;

/// Rows removed by one purge sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeReport {
    pub certificates: usize,
    pub tags: usize,
}

#[derive(Clone)]
pub struct Registry {
    db: DbService,
    certificates: CertificateStore,
    tags: TagStore,
}

impl Registry {
    pub fn new(db: DbService) -> Self {
        Self {
            certificates: CertificateStore::new(&db),
            tags: TagStore::new(&db),
            db,
        }
    }

    /// Open the configured database file
    pub async fn open(config: &Config) -> RegistryResult<Self> {
        Ok(Self::new(DbService::new(config).await?))
    }

    /// Registry over a private in-memory database
    pub async fn in_memory() -> RegistryResult<Self> {
        Ok(Self::new(DbService::in_memory().await?))
    }

    pub fn certificates(&self) -> &CertificateStore {
        &self.certificates
    }

    pub fn tags(&self) -> &TagStore {
        &self.tags
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }

    /// Purge soft-deleted certificates, then soft-deleted tags
    pub async fn purge_pending_records(&self) -> RegistryResult<PurgeReport> {
        let certificates = self.certificates.purge_pending_records().await?;
        let tags = match self.tags.purge_pending_records().await {
            Ok(tags) => tags,
            Err(e) => {
                tracing::info!(certificates, "Certificates purged before tag sweep failed");
                return Err(e);
            }
        };
        Ok(PurgeReport { certificates, tags })
    }
}

/// Repository `NotFound` becomes a keyed registry error; the rest is storage
pub(crate) fn entity_error(err: RepoError, entity: Entity, key: impl ToString) -> RegistryError {
    match err {
        RepoError::NotFound(_) => RegistryError::not_found(entity, key.to_string()),
        other => other.into(),
    }
}

pub(crate) fn names_for_log<S: AsRef<str>>(names: &[S]) -> Vec<&str> {
    names.iter().map(|n| n.as_ref()).collect()
}
