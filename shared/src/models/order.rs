//! Order Model

use super::Certificate;
use serde::{Deserialize, Serialize};

/// Order entity
///
/// `total_cost` is fixed at creation from the live certificate prices.
/// `certificates` is ordered by certificate id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub total_cost: f64,
    pub created_at: i64,
    pub is_active: bool,
    #[serde(default)]
    #[cfg_attr(feature = "db", sqlx(skip))]
    pub certificates: Vec<Certificate>,
}

impl super::SoftDelete for Order {
    fn is_active(&self) -> bool {
        self.is_active
    }

    fn mark_inactive(&mut self) {
        self.is_active = false;
    }
}

/// Create order payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderCreate {
    pub user_id: i64,
    pub certificate_ids: Vec<i64>,
}
