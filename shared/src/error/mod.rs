//! Unified error system for the certificate registry
//!
//! - [`ErrorCode`]: standardized numeric codes with an HTTP status mapping
//! - [`RegistryError`]: the closed error union returned by every operation
//!
//! # Example
//!
//! ```
//! use shared::error::{Entity, ErrorCode, RegistryError};
//!
//! let err = RegistryError::not_found(Entity::Tag, "production");
//! assert_eq!(err.code(), ErrorCode::TagNotFound);
//! assert_eq!(err.http_status().as_u16(), 404);
//! ```

mod codes;
mod http;
mod types;

pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{Entity, RegistryError, RegistryResult};
