//! Tag Repository

use super::{RepoError, RepoResult};
use shared::models::{Tag, TagCreate};
use sqlx::SqlitePool;
use uuid::Uuid;

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Tag>> {
    let tags = sqlx::query_as::<_, Tag>(
        "SELECT id, name, description, created_at, updated_at, deleted_at FROM tag WHERE deleted_at IS NULL ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(tags)
}

pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> RepoResult<Option<Tag>> {
    let tag = sqlx::query_as::<_, Tag>(
        "SELECT id, name, description, created_at, updated_at, deleted_at FROM tag WHERE id = ? AND deleted_at IS NULL",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(tag)
}

/// Exact, case-sensitive name match
pub async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<Tag>> {
    let tag = sqlx::query_as::<_, Tag>(
        "SELECT id, name, description, created_at, updated_at, deleted_at FROM tag WHERE name = ? AND deleted_at IS NULL LIMIT 1",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;
    Ok(tag)
}

/// Soft-deleted rows only (purge input)
pub async fn find_deleted(pool: &SqlitePool) -> RepoResult<Vec<Tag>> {
    let tags = sqlx::query_as::<_, Tag>(
        "SELECT id, name, description, created_at, updated_at, deleted_at FROM tag WHERE deleted_at IS NOT NULL ORDER BY rowid",
    )
    .fetch_all(pool)
    .await?;
    Ok(tags)
}

/// Insert a new row; a live row with the same name yields `RepoError::Duplicate`
pub async fn create(pool: &SqlitePool, data: TagCreate) -> RepoResult<Tag> {
    let id = Uuid::new_v4();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO tag (id, name, description, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create tag".into()))
}

pub async fn update_description(
    pool: &SqlitePool,
    id: Uuid,
    description: Option<&str>,
) -> RepoResult<Tag> {
    let rows = sqlx::query(
        "UPDATE tag SET description = ?1, updated_at = ?2 WHERE id = ?3 AND deleted_at IS NULL",
    )
    .bind(description)
    .bind(shared::util::now_millis())
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Tag {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Tag {id} not found")))
}

/// Mark a live row deleted
pub async fn soft_delete(pool: &SqlitePool, id: Uuid) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE tag SET deleted_at = ?1, updated_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Tag {id} not found")));
    }
    Ok(())
}

/// Remove a row permanently; associations must already be cleared
pub async fn hard_delete(tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>, id: Uuid) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM tag WHERE id = ?")
        .bind(id)
        .execute(&mut **tx)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Tag {id} not found")));
    }
    Ok(())
}
