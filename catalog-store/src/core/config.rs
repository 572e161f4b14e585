//! Catalog store configuration

/// Store configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | DATABASE_PATH | catalog.db | SQLite file, `:memory:` for an ephemeral store |
/// | DB_MAX_CONNECTIONS | 5 | pool size |
/// | DEFAULT_PAGE_SIZE | 10 | page size for callers that omit one |
/// | MAX_PAGE_SIZE | 100 | largest accepted page size |
/// | LOG_LEVEL | info | tracing filter |
/// | LOG_JSON | false | JSON console output (forced on in production) |
/// | LOG_DIR | (unset) | enables rolling file logs |
/// | ENVIRONMENT | development | development / production |
///
/// # Example
///
/// ```ignore
/// DATABASE_PATH=/data/catalog.db MAX_PAGE_SIZE=50 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub db_max_connections: u32,
    pub default_page_size: u32,
    pub max_page_size: u32,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
    /// development | production
    pub environment: String,
}

impl Config {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            database_path: std::env::var("DATABASE_PATH").unwrap_or_else(|_| "catalog.db".into()),
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            default_page_size: std::env::var("DEFAULT_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            max_page_size: std::env::var("MAX_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_dir: std::env::var("LOG_DIR").ok().filter(|v| !v.is_empty()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// Ephemeral configuration for tests and tooling
    pub fn in_memory() -> Self {
        Self {
            database_path: ":memory:".into(),
            ..Self::default()
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path == ":memory:"
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Production always logs JSON; elsewhere `LOG_JSON` decides
    pub fn json_logs(&self) -> bool {
        self.log_json || self.is_production()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: "catalog.db".into(),
            db_max_connections: 5,
            default_page_size: 10,
            max_page_size: 100,
            log_level: "info".into(),
            log_json: false,
            log_dir: None,
            environment: "development".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.max_page_size, 100);
        assert_eq!(config.default_page_size, 10);
        assert!(!config.is_production());
        assert!(!config.json_logs());
        assert!(!config.is_in_memory());
        assert!(Config::in_memory().is_in_memory());
    }

    #[test]
    fn test_production_forces_json_logs() {
        let config = Config {
            environment: "production".into(),
            ..Config::default()
        };
        assert!(config.json_logs());

        let config = Config {
            log_json: true,
            ..Config::default()
        };
        assert!(config.json_logs());
    }
}
