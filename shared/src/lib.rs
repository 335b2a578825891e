//! Shared types for the certificate registry
//!
//! Domain models, the closed error taxonomy, the validation gate and
//! fingerprint helpers used by both the extractor and the registry crates.

pub mod error;
pub mod fingerprint;
pub mod models;
pub mod util;
pub mod validation;

// Re-exports
pub use error::{Entity, ErrorCode, RegistryError, RegistryResult};
pub use serde::{Deserialize, Serialize};
