//! Utility module: error types, logging and input validation

pub mod error;
pub mod logger;
pub mod validation;

pub use error::{ErrorKind, ServiceError, ServiceResult};
