//! Sort criteria
//!
//! Closed enumeration of sort fields and directions. Anything outside the
//! enumeration is rejected while parsing, so ORDER BY clauses are only ever
//! built from whitelisted columns.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported sort {kind}: {value}")]
pub struct SortParseError {
    pub kind: &'static str,
    pub value: String,
}

/// Sort field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortBy {
    #[default]
    Id,
    Name,
    Date,
    Cost,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Name => "NAME",
            Self::Date => "DATE",
            Self::Cost => "COST",
        }
    }
}

impl FromStr for SortBy {
    type Err = SortParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ID" => Ok(Self::Id),
            "NAME" => Ok(Self::Name),
            "DATE" => Ok(Self::Date),
            "COST" => Ok(Self::Cost),
            _ => Err(SortParseError {
                kind: "field",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortType {
    #[default]
    Asc,
    Desc,
}

impl SortType {
    /// SQL keyword for this direction
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for SortType {
    type Err = SortParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(Self::Asc),
            "DESC" => Ok(Self::Desc),
            _ => Err(SortParseError {
                kind: "direction",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for SortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Listing criteria shared by every paginated query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    #[serde(default)]
    pub sort_by: SortBy,
    #[serde(default)]
    pub sort_type: SortType,
}

impl SearchCriteria {
    pub fn new(sort_by: SortBy, sort_type: SortType) -> Self {
        Self { sort_by, sort_type }
    }

    /// Parse raw query values, rejecting anything outside the enumeration
    pub fn parse(sort_by: &str, sort_type: &str) -> Result<Self, SortParseError> {
        Ok(Self {
            sort_by: sort_by.parse()?,
            sort_type: sort_type.parse()?,
        })
    }
}
