//! Service-layer error
//!
//! Every failure leaving a service is a [`ServiceError`]. It keeps the
//! original kind so the boundary layer can pick a response code.

use crate::db::repository::RepoError;
use shared::error::{AppError, ErrorCode};
use shared::{PageError, criteria::SortParseError};
use thiserror::Error;

/// Prefix carried by every validation message
pub const VALIDATION_PREFIX: &str = "Failed to validate: ";

/// Failure kind, independent of the message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Persistence,
    InvalidPage,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Persistence failure: {0}")]
    Persistence(String),

    #[error("{0}")]
    InvalidPage(String),
}

impl ServiceError {
    /// Validation failure with the standard prefix
    pub fn validation(reason: impl AsRef<str>) -> Self {
        Self::Validation(format!("{VALIDATION_PREFIX}{}", reason.as_ref()))
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Persistence(_) => ErrorKind::Persistence,
            Self::InvalidPage(_) => ErrorKind::InvalidPage,
        }
    }

    /// Message without the variant decoration
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(m) | Self::NotFound(m) | Self::Persistence(m) | Self::InvalidPage(m) => {
                m.as_str()
            }
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => Self::NotFound(msg),
            RepoError::Duplicate(msg) | RepoError::Validation(msg) => Self::validation(msg),
            RepoError::Database(msg) => Self::Persistence(msg),
        }
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::from(err).into()
    }
}

impl From<PageError> for ServiceError {
    fn from(err: PageError) -> Self {
        Self::InvalidPage(err.to_string())
    }
}

impl From<SortParseError> for ServiceError {
    fn from(err: SortParseError) -> Self {
        Self::validation(err.to_string())
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        let code = match err.kind() {
            ErrorKind::Validation => ErrorCode::ValidationFailed,
            ErrorKind::NotFound => ErrorCode::NotFound,
            ErrorKind::InvalidPage => ErrorCode::InvalidPage,
            ErrorKind::Persistence => ErrorCode::DatabaseError,
        };
        AppError::with_message(code, err.message())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_prefix() {
        let err = ServiceError::validation("cost must be positive");
        assert_eq!(err.to_string(), "Failed to validate: cost must be positive");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_repo_error_mapping() {
        let err: ServiceError = RepoError::NotFound("Tag 3 not found".into()).into();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err: ServiceError = RepoError::Duplicate("tag spa already exists".into()).into();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.message(), "Failed to validate: tag spa already exists");

        let err: ServiceError = RepoError::Database("disk I/O error".into()).into();
        assert_eq!(err.kind(), ErrorKind::Persistence);
    }

    #[test]
    fn test_page_error_mapping() {
        let err: ServiceError = PageError::InvalidPage(0).into();
        assert_eq!(err.kind(), ErrorKind::InvalidPage);
        assert_eq!(err.message(), "page must be at least 1, got 0");
    }

    #[test]
    fn test_into_app_error() {
        let app: AppError = ServiceError::not_found("Failed to get order by id: 4").into();
        assert_eq!(app.code, ErrorCode::NotFound);
        assert_eq!(app.message, "Failed to get order by id: 4");

        let app: AppError = ServiceError::Persistence("locked".into()).into();
        assert_eq!(app.code, ErrorCode::DatabaseError);
    }
}
