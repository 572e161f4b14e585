//! Gift Certificate Model

use super::Tag;
use serde::{Deserialize, Serialize};

/// Gift certificate entity (live row + active tags)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Certificate {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub duration_days: i32,
    pub created_at: i64,
    pub last_updated_at: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    #[cfg_attr(feature = "db", sqlx(skip))]
    pub tags: Vec<Tag>,
}

fn default_true() -> bool {
    true
}

impl super::SoftDelete for Certificate {
    fn is_active(&self) -> bool {
        self.is_active
    }

    fn mark_inactive(&mut self) {
        self.is_active = false;
    }
}

/// Create certificate payload
///
/// `tags` are tag names; unknown names are created on the fly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CertificateCreate {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub duration_days: i32,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Update certificate payload (all optional, `None` keeps the current value)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CertificateUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub duration_days: Option<i32>,
    pub tags: Option<Vec<String>>,
}

impl CertificateUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.duration_days.is_none()
            && self.tags.is_none()
    }
}

/// Kind of change a history record captures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum RevisionType {
    Add,
    Mod,
    Del,
}

/// One immutable entry of the certificate history table
///
/// `snapshot` is the full certificate state (tags included) as it was
/// when the revision was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CertificateRevision {
    pub revision: i64,
    pub certificate_id: i64,
    pub revision_type: RevisionType,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub snapshot: Certificate,
    pub revised_at: i64,
}
