//! Certificate History Repository
//!
//! Append-only revision log. Rows are only ever inserted; the schema
//! rejects UPDATE and DELETE with triggers.

use super::RepoResult;
use shared::models::{Certificate, CertificateRevision, RevisionType};
use sqlx::{Executor, QueryBuilder, Sqlite};

const COLUMNS: &str = "revision, certificate_id, revision_type, snapshot, revised_at";

/// Append a snapshot of `cert`; returns the new revision number
pub async fn append<'e, E>(
    executor: E,
    revision_type: RevisionType,
    cert: &Certificate,
    revised_at: i64,
) -> RepoResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let snapshot = serde_json::to_string(cert)?;
    let revision = sqlx::query_scalar::<_, i64>(
        "INSERT INTO certificate_history (certificate_id, revision_type, snapshot, revised_at) \
         VALUES (?1, ?2, ?3, ?4) RETURNING revision",
    )
    .bind(cert.id)
    .bind(revision_type)
    .bind(snapshot)
    .bind(revised_at)
    .fetch_one(executor)
    .await?;

    tracing::info!(
        target: "audit",
        certificate_id = cert.id,
        revision,
        revision_type = ?revision_type,
        "Certificate revision recorded"
    );
    Ok(revision)
}

/// First recorded revision of each certificate in `certificate_ids`
///
/// One grouped `MIN(revision)` query for the whole set. Certificates with
/// no history are simply absent from the result.
pub async fn find_first_revisions<'e, E>(
    executor: E,
    certificate_ids: &[i64],
) -> RepoResult<Vec<CertificateRevision>>
where
    E: Executor<'e, Database = Sqlite>,
{
    if certificate_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut qb = QueryBuilder::<Sqlite>::new(format!(
        "SELECT {COLUMNS} FROM certificate_history WHERE revision IN (\
         SELECT MIN(revision) FROM certificate_history WHERE certificate_id IN ("
    ));
    let mut ids = qb.separated(", ");
    for id in certificate_ids {
        ids.push_bind(*id);
    }
    qb.push(") GROUP BY certificate_id) ORDER BY certificate_id");

    let revisions = qb
        .build_query_as::<CertificateRevision>()
        .fetch_all(executor)
        .await?;
    Ok(revisions)
}

/// Full history of one certificate, oldest first
pub async fn find_revisions<'e, E>(
    executor: E,
    certificate_id: i64,
) -> RepoResult<Vec<CertificateRevision>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "SELECT {COLUMNS} FROM certificate_history WHERE certificate_id = ? ORDER BY revision"
    );
    let revisions = sqlx::query_as::<_, CertificateRevision>(&sql)
        .bind(certificate_id)
        .fetch_all(executor)
        .await?;
    Ok(revisions)
}
