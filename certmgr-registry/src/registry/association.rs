//! Tag association protocol
//!
//! Shared by both stores. Names are resolved up front and the whole batch
//! fails on the first unknown name, before anything is written. The
//! resulting link changes are then written in one transaction.

use crate::db::repository::{RepoError, certificate, certificate_tag, tag};
use shared::error::{Entity, RegistryError, RegistryResult};
use shared::models::Tag;
use sqlx::SqlitePool;
use uuid::Uuid;

/// How resolved tags are combined with a certificate's current set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagSetChange {
    /// current ∪ resolved
    Union,
    /// current \ resolved
    Difference,
}

/// Exact name lookup without preloading certificates
pub(crate) async fn lookup_tag(pool: &SqlitePool, name: &str) -> RegistryResult<Tag> {
    tag::find_by_name(pool, name)
        .await?
        .ok_or_else(|| RegistryError::not_found(Entity::Tag, name))
}

/// Resolve every name, de-duplicated by tag id; fails fast on the first unknown name
pub(crate) async fn resolve_tags<S: AsRef<str>>(
    pool: &SqlitePool,
    names: &[S],
) -> RegistryResult<Vec<Tag>> {
    let mut resolved: Vec<Tag> = Vec::with_capacity(names.len());
    for name in names {
        let found = lookup_tag(pool, name.as_ref()).await?;
        if !resolved.iter().any(|t| t.id == found.id) {
            resolved.push(found);
        }
    }
    Ok(resolved)
}

/// Write the tag-set change for one certificate atomically
///
/// Returns the number of link rows inserted or removed.
pub(crate) async fn apply(
    pool: &SqlitePool,
    certificate_id: Uuid,
    change: TagSetChange,
    tags: &[Tag],
) -> RegistryResult<u64> {
    let mut tx = pool.begin().await.map_err(RepoError::from)?;

    let mut changed = 0;
    for t in tags {
        changed += match change {
            TagSetChange::Union => certificate_tag::insert(&mut tx, certificate_id, t.id).await?,
            TagSetChange::Difference => {
                certificate_tag::delete(&mut tx, certificate_id, t.id).await?
            }
        };
    }

    // Certificate deleted since it was looked up: drop the whole change
    certificate::touch(&mut tx, certificate_id)
        .await
        .map_err(|e| super::entity_error(e, Entity::Certificate, certificate_id))?;

    tx.commit().await.map_err(RepoError::from)?;

    tracing::debug!(
        certificate_id = %certificate_id,
        change = ?change,
        changed,
        "Applied tag set change"
    );
    Ok(changed)
}

/// Clear a certificate's links, then remove the row
pub(crate) async fn purge_certificate(pool: &SqlitePool, id: Uuid) -> RegistryResult<u64> {
    let mut tx = pool.begin().await.map_err(RepoError::from)?;
    let cleared = certificate_tag::delete_by_certificate(&mut tx, id).await?;
    certificate::hard_delete(&mut tx, id)
        .await
        .map_err(|e| super::entity_error(e, Entity::Certificate, id))?;
    tx.commit().await.map_err(RepoError::from)?;
    Ok(cleared)
}

/// Clear a tag's links, then remove the row
pub(crate) async fn purge_tag(pool: &SqlitePool, id: Uuid) -> RegistryResult<u64> {
    let mut tx = pool.begin().await.map_err(RepoError::from)?;
    let cleared = certificate_tag::delete_by_tag(&mut tx, id).await?;
    tag::hard_delete(&mut tx, id)
        .await
        .map_err(|e| super::entity_error(e, Entity::Tag, id))?;
    tx.commit().await.map_err(RepoError::from)?;
    Ok(cleared)
}
