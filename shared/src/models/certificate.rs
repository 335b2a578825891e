//! Certificate Model

use super::tag::Tag;
use certmgr_x509::CertRecord;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Stored certificate with its live tags
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Certificate {
    pub id: Uuid,
    /// Lowercase hex SHA-256 of the DER bytes (natural key)
    pub fingerprint: String,
    pub subject: String,
    pub issuer: String,
    /// Lowercase hex, no leading zeros
    pub serial_number: String,
    pub signature_algorithm: String,
    pub authority_key_id: String,
    pub subject_key_id: String,
    /// DNS names then IP addresses, `|`-joined
    pub sans: String,
    pub ocsp: String,
    pub crl: String,
    pub issuing_ca_url: String,
    pub is_ca: bool,
    /// Validity window (Unix millis)
    pub not_before: i64,
    pub not_after: i64,
    pub pem: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,

    /// Live tags, filled by the store after the row is loaded
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Certificate {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t.name == name)
    }
}

/// Create certificate payload, produced by the extractor
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CertificateCreate {
    #[validate(length(min = 1, message = "fingerprint is required"))]
    pub fingerprint: String,
    pub subject: String,
    pub issuer: String,
    pub serial_number: String,
    pub signature_algorithm: String,
    pub authority_key_id: String,
    pub subject_key_id: String,
    pub sans: String,
    pub ocsp: String,
    pub crl: String,
    pub issuing_ca_url: String,
    pub is_ca: bool,
    pub not_before: i64,
    pub not_after: i64,
    pub pem: String,
}

impl From<CertRecord> for CertificateCreate {
    fn from(record: CertRecord) -> Self {
        Self {
            fingerprint: record.fingerprint,
            subject: record.subject,
            issuer: record.issuer,
            serial_number: record.serial_number,
            signature_algorithm: record.signature_algorithm,
            authority_key_id: record.authority_key_id,
            subject_key_id: record.subject_key_id,
            sans: record.sans,
            ocsp: record.ocsp,
            crl: record.crl,
            issuing_ca_url: record.issuing_ca_url,
            is_ca: record.is_ca,
            not_before: record.not_before,
            not_after: record.not_after,
            pem: record.pem,
        }
    }
}
