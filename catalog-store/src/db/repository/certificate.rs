//! Certificate Repository
//!
//! Live certificate rows. Tags are stored as links and attached in one
//! batched query per result set.

use super::ledger::ACTIVE;
use super::{RepoResult, order_by, tag};
use shared::models::Certificate;
use shared::{PageRequest, SearchCriteria, SortBy};
use sqlx::{Executor, QueryBuilder, Sqlite, SqliteConnection};

const COLUMNS: &str =
    "id, name, description, price, duration_days, created_at, last_updated_at, is_active";

const SORT_COLUMNS: [(SortBy, &str); 4] = [
    (SortBy::Id, "id"),
    (SortBy::Name, "name"),
    (SortBy::Date, "created_at"),
    (SortBy::Cost, "price"),
];

/// Lookup by id regardless of state
pub async fn find_by_id<'e, E>(executor: E, id: i64) -> RepoResult<Option<Certificate>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("SELECT {COLUMNS} FROM certificates WHERE id = ?");
    let cert = sqlx::query_as::<_, Certificate>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(cert)
}

pub async fn find_active_by_id<'e, E>(executor: E, id: i64) -> RepoResult<Option<Certificate>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("SELECT {COLUMNS} FROM certificates WHERE id = ? AND {ACTIVE}");
    let cert = sqlx::query_as::<_, Certificate>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(cert)
}

/// Lookup a set of ids regardless of state
pub async fn find_by_ids<'e, E>(executor: E, ids: &[i64]) -> RepoResult<Vec<Certificate>>
where
    E: Executor<'e, Database = Sqlite>,
{
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT {COLUMNS} FROM certificates WHERE id IN ("));
    let mut separated = qb.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    qb.push(") ORDER BY id");

    let certs = qb.build_query_as::<Certificate>().fetch_all(executor).await?;
    Ok(certs)
}

pub async fn find_page<'e, E>(
    executor: E,
    criteria: &SearchCriteria,
    page: PageRequest,
) -> RepoResult<Vec<Certificate>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "SELECT {COLUMNS} FROM certificates WHERE {ACTIVE} ORDER BY {} LIMIT ? OFFSET ?",
        order_by("certificates", criteria, &SORT_COLUMNS)?
    );
    let certs = sqlx::query_as::<_, Certificate>(&sql)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(executor)
        .await?;
    Ok(certs)
}

/// Insert a new row; returns the generated id
pub async fn insert<'e, E>(executor: E, cert: &Certificate) -> RepoResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO certificates (name, description, price, duration_days, created_at, last_updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING id",
    )
    .bind(&cert.name)
    .bind(&cert.description)
    .bind(cert.price)
    .bind(cert.duration_days)
    .bind(cert.created_at)
    .bind(cert.last_updated_at)
    .fetch_one(executor)
    .await?;
    Ok(id)
}

/// Overwrite the mutable columns of an active row
pub async fn update<'e, E>(executor: E, cert: &Certificate) -> RepoResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "UPDATE certificates SET name = ?1, description = ?2, price = ?3, duration_days = ?4, \
         last_updated_at = ?5 WHERE id = ?6 AND {ACTIVE}"
    );
    let rows = sqlx::query(&sql)
        .bind(&cert.name)
        .bind(&cert.description)
        .bind(cert.price)
        .bind(cert.duration_days)
        .bind(cert.last_updated_at)
        .bind(cert.id)
        .execute(executor)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Fill `tags` of every certificate with one query
pub async fn attach_tags(conn: &mut SqliteConnection, certs: &mut [Certificate]) -> RepoResult<()> {
    let ids: Vec<i64> = certs.iter().map(|c| c.id).collect();
    let mut tags = tag::find_for_certificates(conn, &ids).await?;
    for cert in certs.iter_mut() {
        cert.tags = tags.remove(&cert.id).unwrap_or_default();
    }
    Ok(())
}
