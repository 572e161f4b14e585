//! User Model

use serde::{Deserialize, Serialize};

/// User entity, only used as the owner key of orders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub login: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// Create user payload (password is hashed by the caller)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserCreate {
    pub login: String,
    pub password_hash: String,
}
