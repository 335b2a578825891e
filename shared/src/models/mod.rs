//! Data models
//!
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are UUIDs assigned by the registry at creation time.

pub mod certificate;
pub mod tag;

// Re-exports
pub use certificate::*;
pub use tag::*;
