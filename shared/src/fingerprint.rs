//! Fingerprint normalization
//!
//! Callers may hand in SHA-256 fingerprints the way browsers and openssl
//! print them (`AB:CD:...`). Lookups always use the stored lowercase form.

use crate::error::{RegistryError, RegistryResult};

/// Hex length of a SHA-256 digest
pub const FINGERPRINT_HEX_LEN: usize = 64;

/// Strip `:` separators and lowercase; the result must be 64 hex characters
pub fn normalize_fingerprint(input: &str) -> RegistryResult<String> {
    let normalized = input.replace(':', "").to_ascii_lowercase();
    if normalized.len() != FINGERPRINT_HEX_LEN {
        return Err(RegistryError::validation(format!(
            "invalid fingerprint: expected {FINGERPRINT_HEX_LEN} hex characters, got {}",
            normalized.len()
        )));
    }
    hex::decode(&normalized)
        .map_err(|e| RegistryError::validation(format!("invalid fingerprint: {e}")))?;
    Ok(normalized)
}
