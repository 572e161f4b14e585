//! Tag Service

use crate::db::repository::ledger::{self, Ledger};
use crate::db::repository::{RepoError, tag};
use crate::utils::validation::{self, DEFAULT_MAX_PAGE_SIZE};
use crate::utils::{ServiceError, ServiceResult};
use shared::SearchCriteria;
use shared::models::{SoftDelete, Tag, TagCreate};
use shared::pagination::last_page;
use sqlx::SqlitePool;

#[derive(Clone, Debug)]
pub struct TagService {
    pool: SqlitePool,
    max_page_size: u32,
}

impl TagService {
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

    pub async fn get_tag(&self, id: i64) -> ServiceResult<Tag> {
        tag::find_by_id(&self.pool, id)
            .await?
            .filter(SoftDelete::is_visible)
            .ok_or_else(|| ServiceError::not_found(format!("Failed to get tag by id: {id}")))
    }

    pub async fn get_tag_by_name(&self, name: &str) -> ServiceResult<Tag> {
        tag::find_by_name(&self.pool, name.trim())
            .await?
            .filter(SoftDelete::is_visible)
            .ok_or_else(|| ServiceError::not_found(format!("Failed to get tag by name: {name}")))
    }

    pub async fn get_all_tags(&self) -> ServiceResult<Vec<Tag>> {
        Ok(tag::find_all(&self.pool).await?)
    }

    pub async fn get_all_tags_by_page(
        &self,
        criteria: &SearchCriteria,
        page: i64,
        size: i64,
    ) -> ServiceResult<Vec<Tag>> {
        let request = validation::page_request(page, size, self.max_page_size)?;
        tracing::debug!(page, size, sort_by = %criteria.sort_by, sort_type = %criteria.sort_type, "Listing tags");
        Ok(tag::find_page(&self.pool, criteria, request).await?)
    }

    pub async fn get_last_page(&self, size: i64) -> ServiceResult<u32> {
        let total = ledger::count_active(&self.pool, Ledger::Tags).await?;
        Ok(last_page(total, size)?)
    }

    /// Create a tag, or re-activate a soft-deleted tag of the same name
    pub async fn add_tag(&self, data: TagCreate) -> ServiceResult<Tag> {
        validation::validate_tag(&data)?;
        let name = data.name.trim();

        let mut tx = self.pool.begin().await?;
        let tag = match tag::find_by_name(&mut *tx, name).await? {
            Some(existing) if existing.is_visible() => {
                return Err(ServiceError::validation(format!("tag {name} already exists")));
            }
            Some(existing) => {
                ledger::restore(&mut *tx, Ledger::Tags, existing.id).await?;
                Tag {
                    is_active: true,
                    ..existing
                }
            }
            None => {
                let id = tag::insert(&mut *tx, name).await?;
                tracing::info!(tag_id = id, name = %name, "Tag created");
                Tag {
                    id,
                    name: name.to_string(),
                    is_active: true,
                }
            }
        };
        tx.commit().await?;
        Ok(tag)
    }

    pub async fn delete_tag(&self, id: i64) -> ServiceResult<()> {
        ledger::mark_inactive(&self.pool, Ledger::Tags, id)
            .await
            .map_err(|e| match e {
                RepoError::NotFound(_) => {
                    ServiceError::not_found(format!("Failed to get tag by id: {id}"))
                }
                other => other.into(),
            })
    }
}
