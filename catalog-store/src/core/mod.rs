//! Core module: configuration and service composition

pub mod config;
pub mod state;

pub use config::Config;
pub use state::CatalogState;
