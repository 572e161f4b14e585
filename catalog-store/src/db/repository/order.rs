//! Order Repository

use super::ledger::ACTIVE;
use super::{RepoResult, certificate, order_by};
use shared::models::{Certificate, Order};
use shared::{PageRequest, SearchCriteria, SortBy};
use sqlx::{Executor, QueryBuilder, Sqlite, SqliteConnection};
use std::collections::HashMap;

const COLUMNS: &str = "id, user_id, total_cost, created_at, is_active";

const SORT_COLUMNS: [(SortBy, &str); 3] = [
    (SortBy::Id, "id"),
    (SortBy::Date, "created_at"),
    (SortBy::Cost, "total_cost"),
];

pub async fn find_active_by_id<'e, E>(executor: E, id: i64) -> RepoResult<Option<Order>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("SELECT {COLUMNS} FROM orders WHERE id = ? AND {ACTIVE}");
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(order)
}

/// One page of active orders, optionally restricted to one user
pub async fn find_page<'e, E>(
    executor: E,
    user_id: Option<i64>,
    criteria: &SearchCriteria,
    page: PageRequest,
) -> RepoResult<Vec<Order>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let ordering = order_by("orders", criteria, &SORT_COLUMNS)?;
    let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM orders WHERE {ACTIVE}"));
    if let Some(user_id) = user_id {
        qb.push(" AND user_id = ").push_bind(user_id);
    }
    qb.push(format!(" ORDER BY {ordering} LIMIT "))
        .push_bind(page.limit())
        .push(" OFFSET ")
        .push_bind(page.offset());

    let orders = qb.build_query_as::<Order>().fetch_all(executor).await?;
    Ok(orders)
}

pub async fn count_active_by_user<'e, E>(executor: E, user_id: i64) -> RepoResult<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("SELECT COUNT(*) FROM orders WHERE user_id = ? AND {ACTIVE}");
    let count: i64 = sqlx::query_scalar(&sql)
        .bind(user_id)
        .fetch_one(executor)
        .await?;
    Ok(count.max(0) as u64)
}

pub async fn insert<'e, E>(executor: E, order: &Order) -> RepoResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO orders (user_id, total_cost, created_at) VALUES (?1, ?2, ?3) RETURNING id",
    )
    .bind(order.user_id)
    .bind(order.total_cost)
    .bind(order.created_at)
    .fetch_one(executor)
    .await?;
    Ok(id)
}

pub async fn link_certificates(
    conn: &mut SqliteConnection,
    order_id: i64,
    certificate_ids: &[i64],
) -> RepoResult<()> {
    for certificate_id in certificate_ids {
        sqlx::query(
            "INSERT OR IGNORE INTO order_certificates (order_id, certificate_id) VALUES (?1, ?2)",
        )
        .bind(order_id)
        .bind(*certificate_id)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

#[derive(sqlx::FromRow)]
struct OrderLink {
    order_id: i64,
    certificate_id: i64,
}

/// Fill `certificates` of every order from the live table
///
/// Three queries for the whole slice (links, certificates, tags). Inactive
/// certificates are included: an order keeps what it was placed with.
pub async fn attach_certificates(conn: &mut SqliteConnection, orders: &mut [Order]) -> RepoResult<()> {
    if orders.is_empty() {
        return Ok(());
    }

    let mut qb = QueryBuilder::<Sqlite>::new(
        "SELECT order_id, certificate_id FROM order_certificates WHERE order_id IN (",
    );
    let mut ids = qb.separated(", ");
    for order in orders.iter() {
        ids.push_bind(order.id);
    }
    qb.push(") ORDER BY order_id, certificate_id");
    let links = qb.build_query_as::<OrderLink>().fetch_all(&mut *conn).await?;

    let mut certificate_ids: Vec<i64> = links.iter().map(|l| l.certificate_id).collect();
    certificate_ids.sort_unstable();
    certificate_ids.dedup();

    let mut certs = certificate::find_by_ids(&mut *conn, &certificate_ids).await?;
    certificate::attach_tags(conn, &mut certs).await?;
    let by_id: HashMap<i64, Certificate> = certs.into_iter().map(|c| (c.id, c)).collect();

    let mut by_order: HashMap<i64, Vec<Certificate>> = HashMap::new();
    for link in links {
        if let Some(cert) = by_id.get(&link.certificate_id) {
            by_order.entry(link.order_id).or_default().push(cert.clone());
        }
    }
    for order in orders.iter_mut() {
        order.certificates = by_order.remove(&order.id).unwrap_or_default();
    }
    Ok(())
}
