//! Certificate Repository

use super::{RepoError, RepoResult};
use shared::models::{Certificate, CertificateCreate};
use sqlx::SqlitePool;
use uuid::Uuid;

const COLUMNS: &str = "id, fingerprint, subject, issuer, serial_number, signature_algorithm, authority_key_id, subject_key_id, sans, ocsp, crl, issuing_ca_url, is_ca, not_before, not_after, pem, created_at, updated_at, deleted_at";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Certificate>> {
    let sql = format!("SELECT {COLUMNS} FROM certificate WHERE deleted_at IS NULL ORDER BY rowid");
    let certs = sqlx::query_as::<_, Certificate>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(certs)
}

pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> RepoResult<Option<Certificate>> {
    let sql = format!("SELECT {COLUMNS} FROM certificate WHERE id = ? AND deleted_at IS NULL");
    let cert = sqlx::query_as::<_, Certificate>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(cert)
}

pub async fn find_by_fingerprint(
    pool: &SqlitePool,
    fingerprint: &str,
) -> RepoResult<Option<Certificate>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM certificate WHERE fingerprint = ? AND deleted_at IS NULL LIMIT 1"
    );
    let cert = sqlx::query_as::<_, Certificate>(&sql)
        .bind(fingerprint)
        .fetch_optional(pool)
        .await?;
    Ok(cert)
}

/// Soft-deleted rows only (purge input)
pub async fn find_deleted(pool: &SqlitePool) -> RepoResult<Vec<Certificate>> {
    let sql =
        format!("SELECT {COLUMNS} FROM certificate WHERE deleted_at IS NOT NULL ORDER BY rowid");
    let certs = sqlx::query_as::<_, Certificate>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(certs)
}

/// Insert a new row; a live row with the same fingerprint yields `RepoError::Duplicate`
pub async fn create(pool: &SqlitePool, data: CertificateCreate) -> RepoResult<Certificate> {
    let id = Uuid::new_v4();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO certificate (id, fingerprint, subject, issuer, serial_number, signature_algorithm, authority_key_id, subject_key_id, sans, ocsp, crl, issuing_ca_url, is_ca, not_before, not_after, pem, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?17)",
    )
    .bind(id)
    .bind(&data.fingerprint)
    .bind(&data.subject)
    .bind(&data.issuer)
    .bind(&data.serial_number)
    .bind(&data.signature_algorithm)
    .bind(&data.authority_key_id)
    .bind(&data.subject_key_id)
    .bind(&data.sans)
    .bind(&data.ocsp)
    .bind(&data.crl)
    .bind(&data.issuing_ca_url)
    .bind(data.is_ca)
    .bind(data.not_before)
    .bind(data.not_after)
    .bind(&data.pem)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create certificate".into()))
}

/// Bump `updated_at` after the tag set changed
pub async fn touch(tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>, id: Uuid) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE certificate SET updated_at = ? WHERE id = ? AND deleted_at IS NULL",
    )
    .bind(shared::util::now_millis())
    .bind(id)
    .execute(&mut **tx)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Certificate {id} not found")));
    }
    Ok(())
}

/// Mark a live row deleted
pub async fn soft_delete(pool: &SqlitePool, id: Uuid) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE certificate SET deleted_at = ?1, updated_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Certificate {id} not found")));
    }
    Ok(())
}

/// Remove a row permanently; associations must already be cleared
pub async fn hard_delete(tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>, id: Uuid) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM certificate WHERE id = ?")
        .bind(id)
        .execute(&mut **tx)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Certificate {id} not found")));
    }
    Ok(())
}
