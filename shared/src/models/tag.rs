//! Tag Model

use serde::{Deserialize, Serialize};

/// Tag entity
///
/// Tags are never renamed and never physically removed; deletion flips
/// `is_active` so certificate history keeps resolving.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Tag {
    pub id: i64,
    pub name: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl super::SoftDelete for Tag {
    fn is_active(&self) -> bool {
        self.is_active
    }

    fn mark_inactive(&mut self) {
        self.is_active = false;
    }
}

/// Create tag payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagCreate {
    pub name: String,
}

impl TagCreate {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
