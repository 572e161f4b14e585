//! Order assembly
//!
//! - [`money`] - decimal totals
//! - [`snapshot`] - first-revision substitution for historical orders
//! - [`service`] - order lifecycle and listings

pub mod money;
pub mod service;
pub mod snapshot;

pub use service::OrderService;
pub use snapshot::{HistoryStore, SnapshotResolver, SqliteHistoryStore};
