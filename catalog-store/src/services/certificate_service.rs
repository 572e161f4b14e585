//! Certificate Service
//!
//! Every write runs in one transaction together with its history record,
//! so a live row never exists without a matching revision.

use crate::db::repository::ledger::{self, Ledger};
use crate::db::repository::{certificate, history, tag};
use crate::utils::validation::{self, DEFAULT_MAX_PAGE_SIZE};
use crate::utils::{ServiceError, ServiceResult};
use shared::SearchCriteria;
use shared::models::{
    Certificate, CertificateCreate, CertificateRevision, CertificateUpdate, RevisionType,
    SoftDelete, Tag,
};
use shared::pagination::last_page;
use shared::util::now_millis;
use sqlx::{SqliteConnection, SqlitePool};

#[derive(Clone, Debug)]
pub struct CertificateService {
    pool: SqlitePool,
    max_page_size: u32,
}

impl CertificateService {
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

    pub async fn get_certificate(&self, id: i64) -> ServiceResult<Certificate> {
        let mut conn = self.pool.acquire().await?;
        let mut cert = certificate::find_active_by_id(&mut *conn, id)
            .await?
            .ok_or_else(|| not_found(id))?;
        certificate::attach_tags(&mut conn, std::slice::from_mut(&mut cert)).await?;
        Ok(cert)
    }

    pub async fn get_all_certificates_by_page(
        &self,
        criteria: &SearchCriteria,
        page: i64,
        size: i64,
    ) -> ServiceResult<Vec<Certificate>> {
        let request = validation::page_request(page, size, self.max_page_size)?;
        tracing::debug!(page, size, sort_by = %criteria.sort_by, sort_type = %criteria.sort_type, "Listing certificates");

        let mut conn = self.pool.acquire().await?;
        let mut certs = certificate::find_page(&mut *conn, criteria, request).await?;
        certificate::attach_tags(&mut conn, &mut certs).await?;
        Ok(certs)
    }

    pub async fn get_last_page(&self, size: i64) -> ServiceResult<u32> {
        let total = ledger::count_active(&self.pool, Ledger::Certificates).await?;
        Ok(last_page(total, size)?)
    }

    pub async fn add_certificate(&self, data: CertificateCreate) -> ServiceResult<Certificate> {
        validation::validate_certificate(&data)?;
        let now = now_millis();
        let mut cert = Certificate {
            id: 0,
            name: data.name.trim().to_string(),
            description: data.description.unwrap_or_default(),
            price: data.price,
            duration_days: data.duration_days,
            created_at: now,
            last_updated_at: now,
            is_active: true,
            tags: Vec::new(),
        };

        let mut tx = self.pool.begin().await?;
        cert.id = certificate::insert(&mut *tx, &cert).await?;
        cert.tags = link_tags(&mut tx, cert.id, &data.tags).await?;
        history::append(&mut *tx, RevisionType::Add, &cert, now).await?;
        tx.commit().await?;

        tracing::info!(certificate_id = cert.id, name = %cert.name, price = cert.price, "Certificate created");
        Ok(cert)
    }

    pub async fn update_certificate(
        &self,
        id: i64,
        data: CertificateUpdate,
    ) -> ServiceResult<Certificate> {
        validation::validate_certificate_update(&data)?;
        let now = now_millis();

        let mut tx = self.pool.begin().await?;
        let mut cert = certificate::find_active_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| not_found(id))?;

        if let Some(name) = data.name {
            cert.name = name.trim().to_string();
        }
        if let Some(description) = data.description {
            cert.description = description;
        }
        if let Some(price) = data.price {
            cert.price = price;
        }
        if let Some(days) = data.duration_days {
            cert.duration_days = days;
        }
        cert.last_updated_at = now;

        certificate::update(&mut *tx, &cert).await?;
        match data.tags {
            Some(names) => cert.tags = link_tags(&mut tx, id, &names).await?,
            None => certificate::attach_tags(&mut tx, std::slice::from_mut(&mut cert)).await?,
        }
        history::append(&mut *tx, RevisionType::Mod, &cert, now).await?;
        tx.commit().await?;

        tracing::info!(certificate_id = id, price = cert.price, "Certificate updated");
        Ok(cert)
    }

    pub async fn delete_certificate(&self, id: i64) -> ServiceResult<()> {
        let now = now_millis();

        let mut tx = self.pool.begin().await?;
        let mut cert = certificate::find_active_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| not_found(id))?;
        certificate::attach_tags(&mut tx, std::slice::from_mut(&mut cert)).await?;

        ledger::mark_inactive(&mut *tx, Ledger::Certificates, id).await?;
        cert.mark_inactive();
        history::append(&mut *tx, RevisionType::Del, &cert, now).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Full revision history, oldest first; includes deleted certificates
    pub async fn get_revisions(&self, id: i64) -> ServiceResult<Vec<CertificateRevision>> {
        if certificate::find_by_id(&self.pool, id).await?.is_none() {
            return Err(not_found(id));
        }
        Ok(history::find_revisions(&self.pool, id).await?)
    }
}

fn not_found(id: i64) -> ServiceError {
    ServiceError::not_found(format!("Failed to get certificate by id: {id}"))
}

/// Resolve tag names (creating or restoring as needed) and replace the links
async fn link_tags(
    conn: &mut SqliteConnection,
    certificate_id: i64,
    names: &[String],
) -> ServiceResult<Vec<Tag>> {
    let mut tags: Vec<Tag> = Vec::with_capacity(names.len());
    for name in names.iter().map(|n| n.trim()) {
        if tags.iter().any(|t| t.name == name) {
            continue;
        }
        let tag = match tag::find_by_name(&mut *conn, name).await? {
            Some(existing) if existing.is_visible() => existing,
            Some(existing) => {
                ledger::restore(&mut *conn, Ledger::Tags, existing.id).await?;
                Tag {
                    is_active: true,
                    ..existing
                }
            }
            None => Tag {
                id: tag::insert(&mut *conn, name).await?,
                name: name.to_string(),
                is_active: true,
            },
        };
        tags.push(tag);
    }

    let ids: Vec<i64> = tags.iter().map(|t| t.id).collect();
    tag::replace_links(conn, certificate_id, &ids).await?;
    tags.sort_by_key(|t| t.id);
    Ok(tags)
}
