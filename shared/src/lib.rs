//! Shared types for the gift certificate catalog
//!
//! Domain models, the pagination engine, sort criteria and the boundary
//! error type used by the store crate and any transport built on top of it.

pub mod criteria;
pub mod error;
pub mod models;
pub mod pagination;
pub mod util;

// Re-exports
pub use criteria::{SearchCriteria, SortBy, SortType};
pub use pagination::{PageError, PageRequest};
pub use serde::{Deserialize, Serialize};
