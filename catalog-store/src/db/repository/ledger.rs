//! Soft-delete ledger
//!
//! Deletion is a state transition on the `is_active` column. Every default
//! read path composes [`ACTIVE`] into its WHERE clause.

use super::{RepoError, RepoResult};
use sqlx::{Executor, Sqlite};

/// Visibility predicate for default read paths
pub const ACTIVE: &str = "is_active = 1";

/// Tables that carry the `is_active` flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ledger {
    Tags,
    Certificates,
    Orders,
}

impl Ledger {
    pub fn table(&self) -> &'static str {
        match self {
            Self::Tags => "tags",
            Self::Certificates => "certificates",
            Self::Orders => "orders",
        }
    }

    fn entity(&self) -> &'static str {
        match self {
            Self::Tags => "Tag",
            Self::Certificates => "Certificate",
            Self::Orders => "Order",
        }
    }
}

/// Flip an active row to inactive
///
/// Fails with `NotFound` when the row is missing or already inactive, so a
/// second delete of the same id reports absence.
pub async fn mark_inactive<'e, E>(executor: E, ledger: Ledger, id: i64) -> RepoResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "UPDATE {} SET is_active = 0 WHERE id = ? AND {ACTIVE}",
        ledger.table()
    );
    let rows = sqlx::query(&sql).bind(id).execute(executor).await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "{} {id} not found",
            ledger.entity()
        )));
    }
    tracing::info!(target: "audit", table = ledger.table(), id, "Soft-deleted");
    Ok(())
}

/// Flip an inactive row back to active
pub async fn restore<'e, E>(executor: E, ledger: Ledger, id: i64) -> RepoResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "UPDATE {} SET is_active = 1 WHERE id = ? AND is_active = 0",
        ledger.table()
    );
    let rows = sqlx::query(&sql).bind(id).execute(executor).await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Inactive {} {id} not found",
            ledger.entity()
        )));
    }
    tracing::info!(target: "audit", table = ledger.table(), id, "Restored");
    Ok(())
}

/// Count of active rows, used for last-page computation
pub async fn count_active<'e, E>(executor: E, ledger: Ledger) -> RepoResult<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("SELECT COUNT(*) FROM {} WHERE {ACTIVE}", ledger.table());
    let count: i64 = sqlx::query_scalar(&sql).fetch_one(executor).await?;
    Ok(count.max(0) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    #[tokio::test]
    async fn test_mark_inactive_twice_reports_absence() {
        let db = DbService::in_memory().await.unwrap();
        sqlx::query("INSERT INTO tags (name) VALUES ('spa')")
            .execute(&db.pool)
            .await
            .unwrap();

        mark_inactive(&db.pool, Ledger::Tags, 1).await.unwrap();
        let err = mark_inactive(&db.pool, Ledger::Tags, 1).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(msg) if msg == "Tag 1 not found"));
    }

    #[tokio::test]
    async fn test_restore_and_count() {
        let db = DbService::in_memory().await.unwrap();
        sqlx::query("INSERT INTO tags (name) VALUES ('spa'), ('food')")
            .execute(&db.pool)
            .await
            .unwrap();

        mark_inactive(&db.pool, Ledger::Tags, 2).await.unwrap();
        assert_eq!(count_active(&db.pool, Ledger::Tags).await.unwrap(), 1);

        restore(&db.pool, Ledger::Tags, 2).await.unwrap();
        assert_eq!(count_active(&db.pool, Ledger::Tags).await.unwrap(), 2);
        assert!(restore(&db.pool, Ledger::Tags, 2).await.is_err());
    }

    #[tokio::test]
    async fn test_mark_inactive_keeps_row() {
        let db = DbService::in_memory().await.unwrap();
        sqlx::query("INSERT INTO tags (name) VALUES ('spa')")
            .execute(&db.pool)
            .await
            .unwrap();

        mark_inactive(&db.pool, Ledger::Tags, 1).await.unwrap();
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tags")
            .fetch_one(&db.pool)
            .await
            .unwrap();
        assert_eq!(total, 1);
    }
}
