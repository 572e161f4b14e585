//! Composition root
//!
//! Services are built once, with their collaborators passed in through
//! constructors. Cloning the state clones pool handles only.

use crate::core::Config;
use crate::db::DbService;
use crate::orders::OrderService;
use crate::services::{CertificateService, TagService, UserService};
use crate::utils::ServiceResult;
use std::sync::Arc;

#[derive(Clone)]
pub struct CatalogState {
    pub config: Config,
    pub db: DbService,
    pub tags: TagService,
    pub certificates: CertificateService,
    pub users: UserService,
    pub orders: Arc<OrderService>,
}

impl CatalogState {
    /// Open the database, apply migrations and wire the services
    pub async fn initialize(config: &Config) -> ServiceResult<Self> {
        let db = if config.is_in_memory() {
            DbService::in_memory().await?
        } else {
            DbService::new(&config.database_path, config.db_max_connections).await?
        };

        let max = config.max_page_size;
        let tags = TagService::new(db.pool.clone()).with_max_page_size(max);
        let certificates = CertificateService::new(db.pool.clone()).with_max_page_size(max);
        let users = UserService::new(db.pool.clone()).with_max_page_size(max);
        let orders = OrderService::new(db.pool.clone(), users.clone()).with_max_page_size(max);

        tracing::info!(
            database = %config.database_path,
            environment = %config.environment,
            max_page_size = max,
            "Catalog state initialized"
        );

        Ok(Self {
            config: config.clone(),
            db,
            tags,
            certificates,
            users,
            orders: Arc::new(orders),
        })
    }
}
