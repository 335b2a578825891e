//! Certificate registry
//!
//! Parses PEM certificates, stores them keyed by SHA-256 fingerprint and
//! lets callers attach tags to them.
//!
//! ```text
//! certmgr-registry/src/
//! ├── core/       # configuration
//! ├── db/         # SQLite pool, migrations, repositories
//! ├── registry/   # certificate and tag stores, association protocol
//! └── utils/      # logging
//! ```

pub mod core;
pub mod db;
pub mod registry;
pub mod utils;

pub use crate::core::Config;
pub use db::DbService;
pub use registry::{CertificateStore, CreateOutcome, PurgeReport, Registry, TagStore};
pub use shared::error::{Entity, ErrorCode, RegistryError, RegistryResult};
pub use shared::models::{Certificate, Tag, TagWithCertificates};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_from_config, init_logger_with_file};
