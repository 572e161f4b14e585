//! Money calculation utilities using rust_decimal for precision
//!
//! Prices are stored as `f64`. Sums are computed as `Decimal` and rounded
//! to 2 places (half-up) before going back to `f64`.

use crate::utils::{ServiceError, ServiceResult};
use rust_decimal::prelude::*;
use shared::models::Certificate;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
///
/// `None` for NaN, infinities and values outside Decimal's range.
#[inline]
pub fn to_decimal(value: f64) -> Option<Decimal> {
    Decimal::from_f64(value)
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Order total from the certificates' current prices
///
/// A price that has no Decimal form, or a sum that overflows, is a
/// validation error rather than a silently dropped line.
pub fn order_total(certificates: &[Certificate]) -> ServiceResult<f64> {
    let mut total = Decimal::ZERO;
    for cert in certificates {
        let price = to_decimal(cert.price).ok_or_else(|| {
            ServiceError::validation(format!(
                "price of certificate {} is out of range: {}",
                cert.id, cert.price
            ))
        })?;
        total = total
            .checked_add(price)
            .ok_or_else(|| ServiceError::validation("order total is out of range"))?;
    }
    Ok(to_f64(total))
}
