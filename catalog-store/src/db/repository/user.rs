//! User Repository

use super::{RepoResult, order_by, unique_violation};
use shared::models::{User, UserCreate};
use shared::{PageRequest, SearchCriteria, SortBy};
use sqlx::{Executor, Sqlite};

const SORT_COLUMNS: [(SortBy, &str); 2] = [(SortBy::Id, "id"), (SortBy::Name, "login")];

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> RepoResult<Option<User>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let user = sqlx::query_as::<_, User>("SELECT id, login, password_hash FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(user)
}

pub async fn find_by_login<'e, E>(executor: E, login: &str) -> RepoResult<Option<User>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let user = sqlx::query_as::<_, User>(
        "SELECT id, login, password_hash FROM users WHERE login = ? LIMIT 1",
    )
    .bind(login)
    .fetch_optional(executor)
    .await?;
    Ok(user)
}

pub async fn exists<'e, E>(executor: E, id: i64) -> RepoResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let found: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = ?)")
        .bind(id)
        .fetch_one(executor)
        .await?;
    Ok(found)
}

pub async fn find_page<'e, E>(
    executor: E,
    criteria: &SearchCriteria,
    page: PageRequest,
) -> RepoResult<Vec<User>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "SELECT id, login, password_hash FROM users ORDER BY {} LIMIT ? OFFSET ?",
        order_by("users", criteria, &SORT_COLUMNS)?
    );
    let users = sqlx::query_as::<_, User>(&sql)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(executor)
        .await?;
    Ok(users)
}

pub async fn count<'e, E>(executor: E) -> RepoResult<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(executor)
        .await?;
    Ok(count.max(0) as u64)
}

pub async fn insert<'e, E>(executor: E, data: &UserCreate) -> RepoResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO users (login, password_hash) VALUES (?1, ?2) RETURNING id",
    )
    .bind(&data.login)
    .bind(&data.password_hash)
    .fetch_one(executor)
    .await
    .map_err(|e| unique_violation(e, || format!("login {} is taken", data.login)))?;
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::RepoError;
    use shared::SortType;

    fn create(login: &str) -> UserCreate {
        UserCreate {
            login: login.into(),
            password_hash: "$argon2id$stub".into(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let db = DbService::in_memory().await.unwrap();
        let id = insert(&db.pool, &create("ann")).await.unwrap();

        assert!(exists(&db.pool, id).await.unwrap());
        assert!(!exists(&db.pool, id + 1).await.unwrap());
        assert_eq!(find_by_login(&db.pool, "ann").await.unwrap().unwrap().id, id);
        assert_eq!(count(&db.pool).await.unwrap(), 1);

        let err = insert(&db.pool, &create("ann")).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_page_by_login() {
        let db = DbService::in_memory().await.unwrap();
        for login in ["cid", "ann", "bob"] {
            insert(&db.pool, &create(login)).await.unwrap();
        }
        let criteria = SearchCriteria::new(SortBy::Name, SortType::Desc);
        let logins: Vec<String> = find_page(&db.pool, &criteria, PageRequest::default())
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.login)
            .collect();
        assert_eq!(logins, vec!["cid", "bob", "ann"]);
    }
}
