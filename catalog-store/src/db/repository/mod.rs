//! Repository Module
//!
//! SQLite access for the catalog tables. Single-statement functions are
//! generic over the executor so they run against the pool or inside a
//! transaction (`&mut *tx`); multi-statement helpers take
//! `&mut SqliteConnection`.

pub mod certificate;
pub mod history;
pub mod ledger;
pub mod order;
pub mod tag;
pub mod user;

use shared::{SearchCriteria, SortBy};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(err: serde_json::Error) -> Self {
        RepoError::Database(format!("Corrupt snapshot payload: {err}"))
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// ORDER BY body for a table's sort whitelist
///
/// Unsupported fields fail before any SQL is built. `id` is appended in the
/// same direction as a tie-breaker so that pages never overlap.
pub(crate) fn order_by(
    entity: &str,
    criteria: &SearchCriteria,
    columns: &[(SortBy, &'static str)],
) -> RepoResult<String> {
    let column = columns
        .iter()
        .find(|(field, _)| *field == criteria.sort_by)
        .map(|(_, column)| *column)
        .ok_or_else(|| {
            RepoError::Validation(format!(
                "sort by {} is not supported for {entity}",
                criteria.sort_by
            ))
        })?;
    let dir = criteria.sort_type.as_sql();
    if column == "id" {
        Ok(format!("id {dir}"))
    } else {
        Ok(format!("{column} {dir}, id {dir}"))
    }
}

/// Map a UNIQUE constraint violation to `Duplicate`
pub(crate) fn unique_violation(err: sqlx::Error, what: impl FnOnce() -> String) -> RepoError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => RepoError::Duplicate(what()),
        _ => err.into(),
    }
}
