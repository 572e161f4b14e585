//! Domain validators
//!
//! Pure checks run before any mutation is persisted. Each failure is a
//! [`ServiceError::Validation`] carrying the reason.

use super::{ServiceError, ServiceResult};
use shared::PageRequest;
use shared::models::{CertificateCreate, CertificateUpdate, TagCreate, UserCreate};

// ── Text length limits ──────────────────────────────────────────────

/// Tag and certificate names
pub const MAX_NAME_LEN: usize = 200;

/// Certificate descriptions
pub const MAX_NOTE_LEN: usize = 500;

/// User logins
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Maximum allowed certificate price
pub const MAX_PRICE: f64 = 1_000_000.0;

// ── Text helpers ────────────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> ServiceResult<()> {
    if value.trim().is_empty() {
        return Err(ServiceError::validation(format!("{field} is empty")));
    }
    if value.chars().count() > max_len {
        return Err(ServiceError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.chars().count()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(value: &Option<String>, field: &str, max_len: usize) -> ServiceResult<()> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(ServiceError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.chars().count()
        )));
    }
    Ok(())
}

// ── Entity validators ───────────────────────────────────────────────

pub fn validate_tag(tag: &TagCreate) -> ServiceResult<()> {
    validate_required_text(&tag.name, "tag name", MAX_NAME_LEN)
}

fn validate_price(price: f64) -> ServiceResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(ServiceError::validation("price must not be negative"));
    }
    if price > MAX_PRICE {
        return Err(ServiceError::validation(format!(
            "price exceeds maximum allowed ({MAX_PRICE}), got {price}"
        )));
    }
    Ok(())
}

fn validate_duration(days: i32) -> ServiceResult<()> {
    if days < 1 {
        return Err(ServiceError::validation("duration must be at least one day"));
    }
    Ok(())
}

pub fn validate_certificate(cert: &CertificateCreate) -> ServiceResult<()> {
    validate_required_text(&cert.name, "certificate name", MAX_NAME_LEN)?;
    validate_optional_text(&cert.description, "description", MAX_NOTE_LEN)?;
    validate_price(cert.price)?;
    validate_duration(cert.duration_days)?;
    for tag in &cert.tags {
        validate_required_text(tag, "tag name", MAX_NAME_LEN)?;
    }
    Ok(())
}

pub fn validate_certificate_update(update: &CertificateUpdate) -> ServiceResult<()> {
    if update.is_empty() {
        return Err(ServiceError::validation("update has no fields"));
    }
    if let Some(name) = &update.name {
        validate_required_text(name, "certificate name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&update.description, "description", MAX_NOTE_LEN)?;
    if let Some(price) = update.price {
        validate_price(price)?;
    }
    if let Some(days) = update.duration_days {
        validate_duration(days)?;
    }
    if let Some(tags) = &update.tags {
        for tag in tags {
            validate_required_text(tag, "tag name", MAX_NAME_LEN)?;
        }
    }
    Ok(())
}

pub fn validate_user(user: &UserCreate) -> ServiceResult<()> {
    validate_required_text(&user.login, "login", MAX_SHORT_TEXT_LEN)?;
    if user.password_hash.trim().is_empty() {
        return Err(ServiceError::validation("password hash is empty"));
    }
    Ok(())
}

/// Structural order checks that need no store access
pub fn validate_order_certificates(certificate_ids: &[i64]) -> ServiceResult<()> {
    if certificate_ids.is_empty() {
        return Err(ServiceError::validation(
            "order must contain at least one certificate",
        ));
    }
    Ok(())
}

/// Order total computed from live certificate prices
pub fn validate_order_cost(total_cost: f64) -> ServiceResult<()> {
    if total_cost.is_nan() || total_cost <= 0.0 {
        return Err(ServiceError::validation("cost must be positive"));
    }
    Ok(())
}

// ── Pagination ──────────────────────────────────────────────────────

/// Largest page size a listing accepts unless configured otherwise
pub const DEFAULT_MAX_PAGE_SIZE: u32 = 100;

/// Validated page window, capped at `max_size`
pub fn page_request(page: i64, size: i64, max_size: u32) -> ServiceResult<PageRequest> {
    let request = PageRequest::new(page, size)?;
    if request.size() > max_size {
        return Err(ServiceError::InvalidPage(format!(
            "page size must be at most {max_size}, got {size}"
        )));
    }
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::ErrorKind;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("spa", "tag name", 10).is_ok());

        let err = validate_required_text("   ", "tag name", 10).unwrap_err();
        assert_eq!(err.to_string(), "Failed to validate: tag name is empty");

        let err = validate_required_text("abcdef", "tag name", 5).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to validate: tag name is too long (6 chars, max 5)"
        );
    }

    #[test]
    fn test_certificate_rules() {
        let mut cert = CertificateCreate {
            name: "Spa day".into(),
            description: None,
            price: 10.0,
            duration_days: 30,
            tags: vec!["spa".into()],
        };
        assert!(validate_certificate(&cert).is_ok());

        cert.price = -1.0;
        assert!(validate_certificate(&cert).is_err());

        cert.price = MAX_PRICE;
        assert!(validate_certificate(&cert).is_ok());
        cert.price = 5e28;
        let err = validate_certificate(&cert).unwrap_err();
        assert!(
            err.to_string()
                .starts_with("Failed to validate: price exceeds maximum allowed (1000000), got ")
        );

        cert.price = 0.0;
        cert.duration_days = 0;
        assert!(validate_certificate(&cert).is_err());

        cert.duration_days = 1;
        cert.tags = vec!["".into()];
        assert!(validate_certificate(&cert).is_err());
    }

    #[test]
    fn test_empty_update_rejected() {
        let err = validate_certificate_update(&CertificateUpdate::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let update = CertificateUpdate {
            price: Some(MAX_PRICE + 0.01),
            ..Default::default()
        };
        let err = validate_certificate_update(&update).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_order_rules() {
        let err = validate_order_certificates(&[]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to validate: order must contain at least one certificate"
        );
        assert!(validate_order_certificates(&[1]).is_ok());

        let err = validate_order_cost(0.0).unwrap_err();
        assert_eq!(err.to_string(), "Failed to validate: cost must be positive");
        assert!(validate_order_cost(f64::NAN).is_err());
        assert!(validate_order_cost(0.01).is_ok());
    }

    #[test]
    fn test_page_request_cap() {
        assert_eq!(page_request(2, 100, 100).unwrap().offset(), 100);

        let err = page_request(1, 101, 100).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPage);

        let err = page_request(0, 10, 100).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPage);
    }
}
