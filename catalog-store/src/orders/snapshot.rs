//! Version Snapshot Resolver
//!
//! Orders display each certificate as its first recorded revision, not the
//! live row. All certificate ids of a result set are resolved with one
//! history lookup.
//!
//! A certificate without any history keeps its live value.

use crate::db::repository::{RepoResult, history};
use crate::utils::ServiceResult;
use async_trait::async_trait;
use shared::models::{Certificate, CertificateRevision, Order};
use sqlx::SqlitePool;
use std::collections::{BTreeSet, HashMap};

/// Read side of the certificate history
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Minimum revision per certificate id, one entry per id that has history
    async fn first_revisions(&self, certificate_ids: &[i64]) -> RepoResult<Vec<CertificateRevision>>;
}

/// History store backed by the `certificate_history` table
#[derive(Clone, Debug)]
pub struct SqliteHistoryStore {
    pool: SqlitePool,
}

impl SqliteHistoryStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistoryStore for SqliteHistoryStore {
    async fn first_revisions(&self, certificate_ids: &[i64]) -> RepoResult<Vec<CertificateRevision>> {
        history::find_first_revisions(&self.pool, certificate_ids).await
    }
}

#[derive(Clone, Debug)]
pub struct SnapshotResolver<H = SqliteHistoryStore> {
    store: H,
}

impl<H: HistoryStore> SnapshotResolver<H> {
    pub fn new(store: H) -> Self {
        Self { store }
    }

    /// Replace every certificate of `orders` with its first revision
    pub async fn resolve(&self, orders: &mut [Order]) -> ServiceResult<()> {
        let ids = distinct_certificate_ids(orders);
        if ids.is_empty() {
            return Ok(());
        }

        let snapshots: HashMap<i64, Certificate> = self
            .store
            .first_revisions(&ids)
            .await?
            .into_iter()
            .map(|rev| (rev.certificate_id, rev.snapshot))
            .collect();

        for id in ids.iter().filter(|id| !snapshots.contains_key(id)) {
            tracing::warn!(certificate_id = id, "No history recorded, keeping live certificate");
        }

        apply_snapshots(orders, &snapshots);
        Ok(())
    }
}

/// Sorted distinct certificate ids across all orders
fn distinct_certificate_ids(orders: &[Order]) -> Vec<i64> {
    orders
        .iter()
        .flat_map(|o| o.certificates.iter().map(|c| c.id))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn apply_snapshots(orders: &mut [Order], snapshots: &HashMap<i64, Certificate>) {
    for order in orders.iter_mut() {
        for cert in order.certificates.iter_mut() {
            if let Some(snapshot) = snapshots.get(&cert.id) {
                *cert = snapshot.clone();
            }
        }
    }
}
