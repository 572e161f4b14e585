//! Gift certificate catalog store
//!
//! Paginated, sortable tags and certificates, plus orders that keep showing
//! the certificates as they were first recorded.
//!
//! ```text
//! catalog-store/src/
//! ├── core/          # config, composition root
//! ├── db/            # SQLite pool, migrations, repositories
//! ├── orders/        # order service, snapshot resolver, money
//! ├── services/      # tag, certificate, user services
//! └── utils/         # errors, logging, validation
//! ```

pub mod core;
pub mod db;
pub mod orders;
pub mod services;
pub mod utils;

pub use crate::core::{CatalogState, Config};
pub use orders::OrderService;
pub use services::{CertificateService, TagService, UserDirectory, UserService};
pub use utils::{ErrorKind, ServiceError, ServiceResult};

pub use utils::logger::{init_logger, init_logger_with_file};

/// Load `.env`, read the configuration and start logging
pub fn setup_environment() -> anyhow::Result<Config> {
    dotenv::dotenv().ok();
    let config = Config::from_env();
    init_logger_with_file(&config.log_level, config.json_logs(), config.log_dir.as_deref())?;
    Ok(config)
}
