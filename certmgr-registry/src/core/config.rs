/// Registry configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | DATABASE_PATH | certmgr.db | SQLite file (created if missing) |
/// | DATABASE_MAX_CONNECTIONS | 5 | Pool size |
/// | DATABASE_BUSY_TIMEOUT_MS | 5000 | Wait on a locked database before failing |
/// | LOG_LEVEL | info | Default tracing filter when `RUST_LOG` is unset |
/// | LOG_JSON | false | Emit JSON log lines |
/// | LOG_DIR | (unset) | Write daily rolling log files here instead of stdout |
///
/// # Example
///
/// ```ignore
/// DATABASE_PATH=/var/lib/certmgr/registry.db LOG_LEVEL=debug cargo test
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub max_connections: u32,
    pub busy_timeout_ms: u64,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from the environment, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            database_path: std::env::var("DATABASE_PATH").unwrap_or_else(|_| "certmgr.db".into()),
            max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            busy_timeout_ms: std::env::var("DATABASE_BUSY_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_dir: std::env::var("LOG_DIR").ok().filter(|v| !v.is_empty()),
        }
    }

    /// Read `.env` (if present) before loading from the environment
    pub fn load() -> Self {
        let _ = dotenv::dotenv();
        Self::from_env()
    }

    /// Override the database location
    ///
    /// Mostly used by tests
    pub fn with_database_path(database_path: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.database_path = database_path.into();
        config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_database_path() {
        let config = Config::with_database_path("/tmp/registry-test.db");
        assert_eq!(config.database_path, "/tmp/registry-test.db");
        assert!(config.max_connections >= 1);
    }
}
