//! Order Assembly Service
//!
//! Creation prices an order from live certificates. Every read path then
//! rewrites the certificates through the [`SnapshotResolver`], so an order
//! keeps showing the certificates as first recorded.

use super::money;
use super::snapshot::{HistoryStore, SnapshotResolver, SqliteHistoryStore};
use crate::db::repository::ledger::{self, Ledger};
use crate::db::repository::{RepoError, certificate, order};
use crate::services::{UserDirectory, UserService};
use crate::utils::validation::{self, DEFAULT_MAX_PAGE_SIZE};
use crate::utils::{ServiceError, ServiceResult};
use shared::SearchCriteria;
use shared::models::{Order, OrderCreate, SoftDelete};
use shared::pagination::last_page;
use shared::util::now_millis;
use sqlx::SqlitePool;

pub struct OrderService<U = UserService, H = SqliteHistoryStore> {
    pool: SqlitePool,
    users: U,
    resolver: SnapshotResolver<H>,
    max_page_size: u32,
}

impl OrderService {
    pub fn new(pool: SqlitePool, users: UserService) -> Self {
        let resolver = SnapshotResolver::new(SqliteHistoryStore::new(pool.clone()));
        Self::with_parts(pool, users, resolver)
    }
}

impl<U: UserDirectory, H: HistoryStore> OrderService<U, H> {
    pub fn with_parts(pool: SqlitePool, users: U, resolver: SnapshotResolver<H>) -> Self {
        Self {
            pool,
            users,
            resolver,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }

    pub fn with_max_page_size(mut self, max_page_size: u32) -> Self {
        self.max_page_size = max_page_size;
        self
    }

    pub async fn get_order_by_id(&self, id: i64) -> ServiceResult<Order> {
        let mut orders = {
            let mut conn = self.pool.acquire().await?;
            let found = order::find_active_by_id(&mut *conn, id)
                .await?
                .ok_or_else(|| not_found(id))?;
            let mut orders = vec![found];
            order::attach_certificates(&mut conn, &mut orders).await?;
            orders
        };
        self.resolver.resolve(&mut orders).await?;
        orders.pop().ok_or_else(|| not_found(id))
    }

    pub async fn get_orders_by_user_id(
        &self,
        user_id: i64,
        criteria: &SearchCriteria,
        page: i64,
        size: i64,
    ) -> ServiceResult<Vec<Order>> {
        let request = validation::page_request(page, size, self.max_page_size)?;
        self.require_user(user_id).await?;
        tracing::debug!(user_id, page, size, sort_by = %criteria.sort_by, sort_type = %criteria.sort_type, "Listing user orders");
        self.load_page(Some(user_id), criteria, request).await
    }

    pub async fn get_all_orders_by_page(
        &self,
        criteria: &SearchCriteria,
        page: i64,
        size: i64,
    ) -> ServiceResult<Vec<Order>> {
        let request = validation::page_request(page, size, self.max_page_size)?;
        tracing::debug!(page, size, sort_by = %criteria.sort_by, sort_type = %criteria.sort_type, "Listing orders");
        self.load_page(None, criteria, request).await
    }

    pub async fn get_last_page(&self, size: i64) -> ServiceResult<u32> {
        let total = ledger::count_active(&self.pool, Ledger::Orders).await?;
        Ok(last_page(total, size)?)
    }

    pub async fn get_last_page_by_user(&self, user_id: i64, size: i64) -> ServiceResult<u32> {
        self.require_user(user_id).await?;
        let total = order::count_active_by_user(&self.pool, user_id).await?;
        Ok(last_page(total, size)?)
    }

    /// Place an order priced from the certificates' current state
    pub async fn add_order(&self, data: OrderCreate) -> ServiceResult<Order> {
        validation::validate_order_certificates(&data.certificate_ids)?;
        // Before `begin()`: the directory runs on its own pool handle, and users are never deleted
        if !self.users.user_exists(data.user_id).await? {
            return Err(ServiceError::validation(format!(
                "user {} does not exist",
                data.user_id
            )));
        }

        let mut ids = data.certificate_ids;
        ids.sort_unstable();
        ids.dedup();

        let mut tx = self.pool.begin().await?;
        let mut certs: Vec<_> = certificate::find_by_ids(&mut *tx, &ids)
            .await?
            .into_iter()
            .filter(SoftDelete::is_visible)
            .collect();
        if let Some(missing) = ids.iter().find(|id| !certs.iter().any(|c| c.id == **id)) {
            return Err(ServiceError::not_found(format!(
                "Failed to get certificate by id: {missing}"
            )));
        }
        certificate::attach_tags(&mut tx, &mut certs).await?;

        let total_cost = money::order_total(&certs)?;
        validation::validate_order_cost(total_cost)?;

        let mut placed = Order {
            id: 0,
            user_id: data.user_id,
            total_cost,
            created_at: now_millis(),
            is_active: true,
            certificates: Vec::new(),
        };
        placed.id = order::insert(&mut *tx, &placed).await?;
        order::link_certificates(&mut tx, placed.id, &ids).await?;
        tx.commit().await?;

        tracing::info!(
            order_id = placed.id,
            user_id = placed.user_id,
            total_cost,
            certificates = ids.len(),
            "Order placed"
        );
        placed.certificates = certs;
        Ok(placed)
    }

    /// Soft-delete an active order; not reversible through this service
    pub async fn delete_order(&self, id: i64) -> ServiceResult<()> {
        let mut tx = self.pool.begin().await?;
        if order::find_active_by_id(&mut *tx, id).await?.is_none() {
            return Err(not_found(id));
        }
        ledger::mark_inactive(&mut *tx, Ledger::Orders, id)
            .await
            .map_err(|e| match e {
                RepoError::NotFound(_) => not_found(id),
                other => other.into(),
            })?;
        tx.commit().await?;
        Ok(())
    }

    async fn require_user(&self, user_id: i64) -> ServiceResult<()> {
        if self.users.user_exists(user_id).await? {
            Ok(())
        } else {
            Err(ServiceError::not_found(format!(
                "Failed to get user by id: {user_id}"
            )))
        }
    }

    async fn load_page(
        &self,
        user_id: Option<i64>,
        criteria: &SearchCriteria,
        request: shared::PageRequest,
    ) -> ServiceResult<Vec<Order>> {
        let mut orders = {
            let mut conn = self.pool.acquire().await?;
            let mut orders = order::find_page(&mut *conn, user_id, criteria, request).await?;
            order::attach_certificates(&mut conn, &mut orders).await?;
            orders
        };
        self.resolver.resolve(&mut orders).await?;
        Ok(orders)
    }
}

fn not_found(id: i64) -> ServiceError {
    ServiceError::not_found(format!("Failed to get order by id: {id}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::services::CertificateService;
    use crate::utils::ErrorKind;
    use shared::models::{CertificateCreate, CertificateUpdate, UserCreate};
    use shared::{SortBy, SortType};

    struct Fixture {
        orders: OrderService,
        certificates: CertificateService,
        user_id: i64,
    }

    async fn fixture() -> Fixture {
        let db = DbService::in_memory().await.unwrap();
        let users = UserService::new(db.pool.clone());
        let user = users
            .add_user(UserCreate {
                login: "ann".into(),
                password_hash: "hash".into(),
            })
            .await
            .unwrap();
        Fixture {
            orders: OrderService::new(db.pool.clone(), users),
            certificates: CertificateService::new(db.pool),
            user_id: user.id,
        }
    }

    async fn add_certificate(fx: &Fixture, name: &str, price: f64) -> i64 {
        fx.certificates
            .add_certificate(CertificateCreate {
                name: name.into(),
                description: None,
                price,
                duration_days: 30,
                tags: vec!["gift".into()],
            })
            .await
            .unwrap()
            .id
    }

    fn create(user_id: i64, certificate_ids: Vec<i64>) -> OrderCreate {
        OrderCreate {
            user_id,
            certificate_ids,
        }
    }

    #[tokio::test]
    async fn test_add_order_prices_live_certificates() {
        let fx = fixture().await;
        let a = add_certificate(&fx, "a", 10.1).await;
        let b = add_certificate(&fx, "b", 20.2).await;

        let placed = fx.orders.add_order(create(fx.user_id, vec![b, a, a])).await.unwrap();
        assert_eq!(placed.total_cost, 30.3);
        assert_eq!(placed.certificates.len(), 2);

        let loaded = fx.orders.get_order_by_id(placed.id).await.unwrap();
        assert_eq!(loaded, placed);
    }

    #[tokio::test]
    async fn test_order_shows_first_revision() {
        let fx = fixture().await;
        let cert = add_certificate(&fx, "Spa", 10.0).await;
        let placed = fx.orders.add_order(create(fx.user_id, vec![cert])).await.unwrap();

        let update = CertificateUpdate {
            price: Some(25.0),
            description: Some("changed".into()),
            ..Default::default()
        };
        fx.certificates.update_certificate(cert, update).await.unwrap();

        let loaded = fx.orders.get_order_by_id(placed.id).await.unwrap();
        assert_eq!(loaded.certificates[0].price, 10.0);
        assert_eq!(loaded.certificates[0].description, "");
        assert_eq!(loaded.total_cost, 10.0);
    }

    #[tokio::test]
    async fn test_empty_order_rejected_without_write() {
        let fx = fixture().await;
        let err = fx.orders.add_order(create(fx.user_id, Vec::new())).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(fx.orders.get_last_page_by_user(fx.user_id, 1).await.unwrap(), 1);
        assert!(
            fx.orders
                .get_all_orders_by_page(&SearchCriteria::default(), 1, 10)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_free_order_rejected() {
        let fx = fixture().await;
        let cert = add_certificate(&fx, "Free", 0.0).await;
        let err = fx.orders.add_order(create(fx.user_id, vec![cert])).await.unwrap_err();
        assert_eq!(err.message(), "Failed to validate: cost must be positive");
    }

    /// Rows written before the price cap existed bypass the validators
    async fn insert_legacy_certificate(fx: &Fixture, price: f64) -> i64 {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO certificates (name, price, duration_days, created_at, last_updated_at) \
             VALUES ('legacy', ?1, 30, 0, 0) RETURNING id",
        )
        .bind(price)
        .fetch_one(&fx.orders.pool)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_price_above_cap_rejected() {
        let fx = fixture().await;
        let err = fx
            .certificates
            .add_certificate(CertificateCreate {
                name: "Yacht".into(),
                description: None,
                price: 5e28,
                duration_days: 30,
                tags: Vec::new(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_out_of_range_total_rejected_without_write() {
        let fx = fixture().await;
        let a = insert_legacy_certificate(&fx, 5e28).await;
        let b = insert_legacy_certificate(&fx, 5e28).await;
        let err = fx.orders.add_order(create(fx.user_id, vec![a, b])).await.unwrap_err();
        assert_eq!(err.message(), "Failed to validate: order total is out of range");

        let huge = insert_legacy_certificate(&fx, 1e30).await;
        let cheap = add_certificate(&fx, "cheap", 5.0).await;
        let err = fx
            .orders
            .add_order(create(fx.user_id, vec![huge, cheap]))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        assert!(
            fx.orders
                .get_all_orders_by_page(&SearchCriteria::default(), 1, 10)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_unknown_user_and_certificate() {
        let fx = fixture().await;
        let cert = add_certificate(&fx, "Spa", 10.0).await;

        let err = fx.orders.add_order(create(99, vec![cert])).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.message(), "Failed to validate: user 99 does not exist");
        assert_eq!(fx.orders.get_last_page(1).await.unwrap(), 1);
        assert!(
            fx.orders
                .get_all_orders_by_page(&SearchCriteria::default(), 1, 10)
                .await
                .unwrap()
                .is_empty()
        );

        let err = fx.orders.add_order(create(fx.user_id, vec![cert, 77])).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        fx.certificates.delete_certificate(cert).await.unwrap();
        let err = fx.orders.add_order(create(fx.user_id, vec![cert])).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = fx
            .orders
            .get_orders_by_user_id(99, &SearchCriteria::default(), 1, 10)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_delete_order() {
        let fx = fixture().await;
        let cert = add_certificate(&fx, "Spa", 10.0).await;
        let placed = fx.orders.add_order(create(fx.user_id, vec![cert])).await.unwrap();

        fx.orders.delete_order(placed.id).await.unwrap();
        let err = fx.orders.get_order_by_id(placed.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.message(), format!("Failed to get order by id: {}", placed.id));

        let err = fx.orders.delete_order(placed.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_sort_by_cost() {
        let fx = fixture().await;
        for price in [30.0, 10.0, 20.0] {
            let cert = add_certificate(&fx, "c", price).await;
            fx.orders.add_order(create(fx.user_id, vec![cert])).await.unwrap();
        }

        let asc = SearchCriteria::new(SortBy::Cost, SortType::Asc);
        let costs: Vec<f64> = fx
            .orders
            .get_orders_by_user_id(fx.user_id, &asc, 1, 10)
            .await
            .unwrap()
            .iter()
            .map(|o| o.total_cost)
            .collect();
        assert_eq!(costs, vec![10.0, 20.0, 30.0]);

        let desc = SearchCriteria::new(SortBy::Cost, SortType::Desc);
        let costs: Vec<f64> = fx
            .orders
            .get_all_orders_by_page(&desc, 1, 10)
            .await
            .unwrap()
            .iter()
            .map(|o| o.total_cost)
            .collect();
        assert_eq!(costs, vec![30.0, 20.0, 10.0]);

        assert_eq!(fx.orders.get_last_page(2).await.unwrap(), 2);
        assert_eq!(fx.orders.get_last_page_by_user(fx.user_id, 3).await.unwrap(), 1);
    }
}
