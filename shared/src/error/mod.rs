//! Error system shared with transport layers
//!
//! - [`ErrorCode`]: numeric codes with HTTP status mapping
//! - [`AppError`]: code + message + optional details
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::validation("tag name is empty").with_detail("field", "name");
//! assert_eq!(err.code, ErrorCode::ValidationFailed);
//! assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);
//! ```

mod codes;
mod http;
mod types;

pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult};
