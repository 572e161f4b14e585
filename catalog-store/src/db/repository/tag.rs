//! Tag Repository

use super::ledger::ACTIVE;
use super::{RepoResult, order_by, unique_violation};
use shared::models::Tag;
use shared::{PageRequest, SearchCriteria, SortBy};
use sqlx::{Executor, QueryBuilder, Sqlite, SqliteConnection};
use std::collections::HashMap;

const SORT_COLUMNS: [(SortBy, &str); 2] = [(SortBy::Id, "id"), (SortBy::Name, "name")];

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> RepoResult<Option<Tag>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let tag = sqlx::query_as::<_, Tag>("SELECT id, name, is_active FROM tags WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(tag)
}

/// Lookup by name, including soft-deleted tags
pub async fn find_by_name<'e, E>(executor: E, name: &str) -> RepoResult<Option<Tag>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let tag = sqlx::query_as::<_, Tag>("SELECT id, name, is_active FROM tags WHERE name = ? LIMIT 1")
        .bind(name)
        .fetch_optional(executor)
        .await?;
    Ok(tag)
}

pub async fn find_all<'e, E>(executor: E) -> RepoResult<Vec<Tag>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("SELECT id, name, is_active FROM tags WHERE {ACTIVE} ORDER BY id");
    let tags = sqlx::query_as::<_, Tag>(&sql).fetch_all(executor).await?;
    Ok(tags)
}

pub async fn find_page<'e, E>(
    executor: E,
    criteria: &SearchCriteria,
    page: PageRequest,
) -> RepoResult<Vec<Tag>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "SELECT id, name, is_active FROM tags WHERE {ACTIVE} ORDER BY {} LIMIT ? OFFSET ?",
        order_by("tags", criteria, &SORT_COLUMNS)?
    );
    let tags = sqlx::query_as::<_, Tag>(&sql)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(executor)
        .await?;
    Ok(tags)
}

pub async fn insert<'e, E>(executor: E, name: &str) -> RepoResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let id = sqlx::query_scalar::<_, i64>("INSERT INTO tags (name) VALUES (?) RETURNING id")
        .bind(name)
        .fetch_one(executor)
        .await
        .map_err(|e| unique_violation(e, || format!("tag {name} already exists")))?;
    Ok(id)
}

#[derive(sqlx::FromRow)]
struct LinkedTag {
    certificate_id: i64,
    id: i64,
    name: String,
    is_active: bool,
}

/// Active tags of each certificate, keyed by certificate id
pub async fn find_for_certificates(
    conn: &mut SqliteConnection,
    certificate_ids: &[i64],
) -> RepoResult<HashMap<i64, Vec<Tag>>> {
    let mut by_certificate: HashMap<i64, Vec<Tag>> = HashMap::new();
    if certificate_ids.is_empty() {
        return Ok(by_certificate);
    }

    let mut qb = QueryBuilder::<Sqlite>::new(
        "SELECT ct.certificate_id, t.id, t.name, t.is_active \
         FROM certificate_tags ct JOIN tags t ON t.id = ct.tag_id \
         WHERE t.is_active = 1 AND ct.certificate_id IN (",
    );
    let mut ids = qb.separated(", ");
    for id in certificate_ids {
        ids.push_bind(*id);
    }
    qb.push(") ORDER BY t.id");

    let rows = qb.build_query_as::<LinkedTag>().fetch_all(&mut *conn).await?;
    for row in rows {
        by_certificate.entry(row.certificate_id).or_default().push(Tag {
            id: row.id,
            name: row.name,
            is_active: row.is_active,
        });
    }
    Ok(by_certificate)
}

/// Replace the tag links of a certificate
pub async fn replace_links(
    conn: &mut SqliteConnection,
    certificate_id: i64,
    tag_ids: &[i64],
) -> RepoResult<()> {
    sqlx::query("DELETE FROM certificate_tags WHERE certificate_id = ?")
        .bind(certificate_id)
        .execute(&mut *conn)
        .await?;
    for tag_id in tag_ids {
        sqlx::query(
            "INSERT OR IGNORE INTO certificate_tags (certificate_id, tag_id) VALUES (?1, ?2)",
        )
        .bind(certificate_id)
        .bind(*tag_id)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::RepoError;
    use crate::db::repository::ledger::{self, Ledger};
    use shared::SortType;

    #[tokio::test]
    async fn test_insert_and_find() {
        let db = DbService::in_memory().await.unwrap();
        let id = insert(&db.pool, "spa").await.unwrap();

        let tag = find_by_id(&db.pool, id).await.unwrap().unwrap();
        assert_eq!(tag.name, "spa");
        assert!(tag.is_active);

        assert_eq!(find_by_name(&db.pool, "spa").await.unwrap(), Some(tag));
        assert!(find_by_name(&db.pool, "food").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_name() {
        let db = DbService::in_memory().await.unwrap();
        insert(&db.pool, "spa").await.unwrap();
        let err = insert(&db.pool, "spa").await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(msg) if msg == "tag spa already exists"));
    }

    #[tokio::test]
    async fn test_page_skips_inactive() {
        let db = DbService::in_memory().await.unwrap();
        for name in ["c", "a", "d", "b"] {
            insert(&db.pool, name).await.unwrap();
        }
        ledger::mark_inactive(&db.pool, Ledger::Tags, 3).await.unwrap();

        let criteria = SearchCriteria::new(SortBy::Name, SortType::Asc);
        let first = find_page(&db.pool, &criteria, PageRequest::new(1, 2).unwrap())
            .await
            .unwrap();
        let second = find_page(&db.pool, &criteria, PageRequest::new(2, 2).unwrap())
            .await
            .unwrap();

        let names: Vec<_> = first.iter().chain(&second).map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(find_all(&db.pool).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_links_hide_inactive_tags() {
        let db = DbService::in_memory().await.unwrap();
        let spa = insert(&db.pool, "spa").await.unwrap();
        let food = insert(&db.pool, "food").await.unwrap();
        sqlx::query("INSERT INTO certificates (name, price, duration_days, created_at, last_updated_at) VALUES ('c', 1.0, 1, 0, 0)")
            .execute(&db.pool)
            .await
            .unwrap();

        let mut conn = db.pool.acquire().await.unwrap();
        replace_links(&mut conn, 1, &[spa, food]).await.unwrap();
        ledger::mark_inactive(&mut *conn, Ledger::Tags, food).await.unwrap();

        let tags = find_for_certificates(&mut conn, &[1]).await.unwrap();
        assert_eq!(tags[&1].len(), 1);
        assert_eq!(tags[&1][0].name, "spa");
    }
}
