//! User Service
//!
//! Users are only an ownership key for orders. Password hashing happens
//! upstream; the payload already carries the hash.

use crate::db::repository::user;
use crate::utils::validation::{self, DEFAULT_MAX_PAGE_SIZE};
use crate::utils::{ServiceError, ServiceResult};
use async_trait::async_trait;
use shared::SearchCriteria;
use shared::models::{User, UserCreate};
use shared::pagination::last_page;
use sqlx::SqlitePool;

/// User lookup collaborator consumed by the order service
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn user_exists(&self, id: i64) -> ServiceResult<bool>;
}

#[derive(Clone, Debug)]
pub struct UserService {
    pool: SqlitePool,
    max_page_size: u32,
}

impl UserService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }

    pub fn with_max_page_size(mut self, max_page_size: u32) -> Self {
        self.max_page_size = max_page_size;
        self
    }

    pub async fn get_user(&self, id: i64) -> ServiceResult<User> {
        user::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("Failed to get user by id: {id}")))
    }

    pub async fn get_user_by_login(&self, login: &str) -> ServiceResult<User> {
        user::find_by_login(&self.pool, login)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("Failed to get user by login: {login}")))
    }

    pub async fn get_all_users_by_page(
        &self,
        criteria: &SearchCriteria,
        page: i64,
        size: i64,
    ) -> ServiceResult<Vec<User>> {
        let request = validation::page_request(page, size, self.max_page_size)?;
        tracing::debug!(page, size, sort_by = %criteria.sort_by, "Listing users");
        Ok(user::find_page(&self.pool, criteria, request).await?)
    }

    pub async fn get_last_page(&self, size: i64) -> ServiceResult<u32> {
        let total = user::count(&self.pool).await?;
        Ok(last_page(total, size)?)
    }

    pub async fn add_user(&self, data: UserCreate) -> ServiceResult<User> {
        validation::validate_user(&data)?;
        let data = UserCreate {
            login: data.login.trim().to_string(),
            ..data
        };

        let id = user::insert(&self.pool, &data).await?;
        tracing::info!(user_id = id, login = %data.login, "User created");
        Ok(User {
            id,
            login: data.login,
            password_hash: data.password_hash,
        })
    }
}

#[async_trait]
impl UserDirectory for UserService {
    async fn user_exists(&self, id: i64) -> ServiceResult<bool> {
        Ok(user::exists(&self.pool, id).await?)
    }
}
