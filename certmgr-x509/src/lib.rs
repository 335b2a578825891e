//! X.509 metadata extraction
//!
//! Turns one PEM-encoded certificate into a [`CertRecord`] holding the
//! descriptive fields the registry stores. Nothing here judges validity:
//! no chain building, no revocation, no signature checks.

mod error;
mod metadata;
mod names;

pub use error::{CertError, Result};
pub use metadata::{CertRecord, LIST_SEPARATOR};

/// Parse a PEM certificate into its canonical record
pub fn parse(pem_text: &str) -> Result<CertRecord> {
    CertRecord::from_pem(pem_text)
}
