//! Pagination engine
//!
//! Converts a 1-based `(page, size)` pair into an SQL window and computes
//! the number of pages for a count of active rows.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected pagination parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("page must be at least 1, got {0}")]
    InvalidPage(i64),
    #[error("page size must be at least 1, got {0}")]
    InvalidSize(i64),
    #[error("page {page} of size {size} starts beyond the addressable range")]
    OutOfRange { page: i64, size: i64 },
}

/// Validated page request (page >= 1, size >= 1, offset fits in `i64`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    /// Accepts signed input so that callers can pass raw query values
    pub fn new(page: i64, size: i64) -> Result<Self, PageError> {
        if page < 1 || page > u32::MAX as i64 {
            return Err(PageError::InvalidPage(page));
        }
        if size < 1 || size > u32::MAX as i64 {
            return Err(PageError::InvalidSize(size));
        }
        if (page - 1).checked_mul(size).is_none() {
            return Err(PageError::OutOfRange { page, size });
        }
        Ok(Self {
            page: page as u32,
            size: size as u32,
        })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Calculate offset for SQL queries
    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1).saturating_mul(self.size as i64)
    }

    /// Get limit for SQL queries
    pub fn limit(&self) -> i64 {
        self.size as i64
    }
}

impl<'de> Deserialize<'de> for PageRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            #[serde(default = "default_page")]
            page: i64,
            #[serde(default = "default_page_size")]
            size: i64,
        }

        let raw = Raw::deserialize(deserializer)?;
        PageRequest::new(raw.page, raw.size).map_err(serde::de::Error::custom)
    }
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    10
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page() as u32,
            size: default_page_size() as u32,
        }
    }
}

/// `(offset, limit)` window for a 1-based page
pub fn paginate(page: i64, size: i64) -> Result<(i64, i64), PageError> {
    let request = PageRequest::new(page, size)?;
    Ok((request.offset(), request.limit()))
}

/// Number of pages needed for `total_active` rows, never less than 1
pub fn last_page(total_active: u64, size: i64) -> Result<u32, PageError> {
    if size < 1 {
        return Err(PageError::InvalidSize(size));
    }
    let pages = total_active.div_ceil(size as u64).max(1);
    Ok(u32::try_from(pages).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_window() {
        assert_eq!(paginate(1, 10), Ok((0, 10)));
    }

    #[test]
    fn test_later_page_window() {
        assert_eq!(paginate(3, 25), Ok((50, 25)));
    }

    #[test]
    fn test_rejects_zero_page() {
        assert_eq!(paginate(0, 10), Err(PageError::InvalidPage(0)));
        assert_eq!(paginate(-4, 10), Err(PageError::InvalidPage(-4)));
    }

    #[test]
    fn test_rejects_zero_size() {
        assert_eq!(paginate(1, 0), Err(PageError::InvalidSize(0)));
        assert_eq!(last_page(10, 0), Err(PageError::InvalidSize(0)));
    }

    #[test]
    fn test_rejects_offset_overflow() {
        let max = u32::MAX as i64;
        assert_eq!(
            paginate(max, max),
            Err(PageError::OutOfRange { page: max, size: max })
        );
        // either axis alone at its maximum still fits
        assert_eq!(paginate(max, 1), Ok((max - 1, 1)));
        assert_eq!(paginate(1, max), Ok((0, max)));
    }

    #[test]
    fn test_last_page_is_ceiling() {
        for (count, size, expected) in [(0, 5, 1), (1, 5, 1), (5, 5, 1), (6, 5, 2), (11, 5, 3), (100, 1, 100)] {
            assert_eq!(last_page(count, size), Ok(expected), "count={count} size={size}");
        }
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let request: PageRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request, PageRequest::default());
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn test_deserialize_rejects_invalid() {
        let result: Result<PageRequest, _> = serde_json::from_str(r#"{"page":0,"size":10}"#);
        assert!(result.is_err());

        let result: Result<PageRequest, _> =
            serde_json::from_str(r#"{"page":4294967295,"size":4294967295}"#);
        assert!(result.is_err());
    }
}
