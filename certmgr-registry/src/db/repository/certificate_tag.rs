//! Certificate <-> Tag join table
//!
//! The relation is symmetric: clearing from either side removes the same rows.

use super::RepoResult;
use shared::models::{Certificate, Tag};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Live tags attached to a certificate
pub async fn find_tags_by_certificate(
    pool: &SqlitePool,
    certificate_id: Uuid,
) -> RepoResult<Vec<Tag>> {
    let tags = sqlx::query_as::<_, Tag>(
        "SELECT t.id, t.name, t.description, t.created_at, t.updated_at, t.deleted_at FROM tag t JOIN certificate_tag ct ON ct.tag_id = t.id WHERE ct.certificate_id = ? AND t.deleted_at IS NULL ORDER BY t.name",
    )
    .bind(certificate_id)
    .fetch_all(pool)
    .await?;
    Ok(tags)
}

/// Live certificates carrying a tag
pub async fn find_certificates_by_tag(
    pool: &SqlitePool,
    tag_id: Uuid,
) -> RepoResult<Vec<Certificate>> {
    let certs = sqlx::query_as::<_, Certificate>(
        "SELECT c.id, c.fingerprint, c.subject, c.issuer, c.serial_number, c.signature_algorithm, c.authority_key_id, c.subject_key_id, c.sans, c.ocsp, c.crl, c.issuing_ca_url, c.is_ca, c.not_before, c.not_after, c.pem, c.created_at, c.updated_at, c.deleted_at FROM certificate c JOIN certificate_tag ct ON ct.certificate_id = c.id WHERE ct.tag_id = ? AND c.deleted_at IS NULL ORDER BY c.rowid",
    )
    .bind(tag_id)
    .fetch_all(pool)
    .await?;
    Ok(certs)
}

/// Association rows for a certificate, whatever the tag state
pub async fn count_by_certificate(pool: &SqlitePool, certificate_id: Uuid) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM certificate_tag WHERE certificate_id = ?",
    )
    .bind(certificate_id)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// Association rows for a tag, whatever the certificate state
pub async fn count_by_tag(pool: &SqlitePool, tag_id: Uuid) -> RepoResult<i64> {
    let count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM certificate_tag WHERE tag_id = ?")
            .bind(tag_id)
            .fetch_one(pool)
            .await?;
    Ok(count)
}

/// Link a tag; an existing link is left alone. Returns rows inserted.
pub async fn insert(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    certificate_id: Uuid,
    tag_id: Uuid,
) -> RepoResult<u64> {
    let rows = sqlx::query(
        "INSERT OR IGNORE INTO certificate_tag (certificate_id, tag_id, created_at) VALUES (?, ?, ?)",
    )
    .bind(certificate_id)
    .bind(tag_id)
    .bind(shared::util::now_millis())
    .execute(&mut **tx)
    .await?;
    Ok(rows.rows_affected())
}

/// Unlink a tag. Returns rows removed.
pub async fn delete(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    certificate_id: Uuid,
    tag_id: Uuid,
) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM certificate_tag WHERE certificate_id = ? AND tag_id = ?")
        .bind(certificate_id)
        .bind(tag_id)
        .execute(&mut **tx)
        .await?;
    Ok(rows.rows_affected())
}

pub async fn delete_by_certificate(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    certificate_id: Uuid,
) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM certificate_tag WHERE certificate_id = ?")
        .bind(certificate_id)
        .execute(&mut **tx)
        .await?;
    Ok(rows.rows_affected())
}

pub async fn delete_by_tag(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    tag_id: Uuid,
) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM certificate_tag WHERE tag_id = ?")
        .bind(tag_id)
        .execute(&mut **tx)
        .await?;
    Ok(rows.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::{certificate, tag};
    use shared::models::{CertificateCreate, TagCreate};

    fn cert_payload(fingerprint: &str) -> CertificateCreate {
        CertificateCreate {
            fingerprint: fingerprint.to_string(),
            subject: "CN=repo-test".into(),
            issuer: "CN=repo-test".into(),
            serial_number: "1".into(),
            signature_algorithm: "ecdsa-with-SHA256".into(),
            authority_key_id: String::new(),
            subject_key_id: String::new(),
            sans: String::new(),
            ocsp: String::new(),
            crl: String::new(),
            issuing_ca_url: String::new(),
            is_ca: false,
            not_before: 0,
            not_after: 0,
            pem: String::new(),
        }
    }

    #[tokio::test]
    async fn test_insert_is_idempotent() {
        let db = DbService::in_memory().await.unwrap();
        let cert = certificate::create(&db.pool, cert_payload("aa")).await.unwrap();
        let t = tag::create(&db.pool, TagCreate::new("edge")).await.unwrap();

        let mut tx = db.pool.begin().await.unwrap();
        assert_eq!(insert(&mut tx, cert.id, t.id).await.unwrap(), 1);
        assert_eq!(insert(&mut tx, cert.id, t.id).await.unwrap(), 0);
        tx.commit().await.unwrap();

        assert_eq!(count_by_certificate(&db.pool, cert.id).await.unwrap(), 1);
        let tags = find_tags_by_certificate(&db.pool, cert.id).await.unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "edge");
    }

    #[tokio::test]
    async fn test_soft_deleted_side_is_hidden_but_rows_kept() {
        let db = DbService::in_memory().await.unwrap();
        let cert = certificate::create(&db.pool, cert_payload("bb")).await.unwrap();
        let t = tag::create(&db.pool, TagCreate::new("legacy")).await.unwrap();

        let mut tx = db.pool.begin().await.unwrap();
        insert(&mut tx, cert.id, t.id).await.unwrap();
        tx.commit().await.unwrap();

        tag::soft_delete(&db.pool, t.id).await.unwrap();
        assert!(find_tags_by_certificate(&db.pool, cert.id).await.unwrap().is_empty());
        assert_eq!(count_by_tag(&db.pool, t.id).await.unwrap(), 1);

        certificate::soft_delete(&db.pool, cert.id).await.unwrap();
        assert!(find_certificates_by_tag(&db.pool, t.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_hard_delete_requires_cleared_links() {
        let db = DbService::in_memory().await.unwrap();
        let cert = certificate::create(&db.pool, cert_payload("cc")).await.unwrap();
        let t = tag::create(&db.pool, TagCreate::new("pinned")).await.unwrap();

        let mut tx = db.pool.begin().await.unwrap();
        insert(&mut tx, cert.id, t.id).await.unwrap();
        tx.commit().await.unwrap();

        // Foreign key blocks removing a still-linked row
        let mut tx = db.pool.begin().await.unwrap();
        assert!(certificate::hard_delete(&mut tx, cert.id).await.is_err());
        tx.rollback().await.unwrap();

        let mut tx = db.pool.begin().await.unwrap();
        assert_eq!(delete_by_certificate(&mut tx, cert.id).await.unwrap(), 1);
        certificate::hard_delete(&mut tx, cert.id).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(count_by_tag(&db.pool, t.id).await.unwrap(), 0);
    }
}
