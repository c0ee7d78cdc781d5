//! List options: pagination and the tag filter.

use crate::error::CoreError;

/// Page size used when the caller does not supply `limit`.
pub const DEFAULT_LIST_LIMIT: i64 = 25;

/// Options for listing products.
///
/// Results are ordered by id; `offset` records are skipped and at most
/// `limit` are returned. A `limit` of zero yields an empty page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    pub offset: i64,
    pub limit: i64,
    /// Restrict to products carrying a tag with exactly this title.
    pub tag: Option<String>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_LIST_LIMIT,
            tag: None,
        }
    }
}

impl ListOptions {
    /// Build options from raw query-string values.
    ///
    /// Absent or empty values take their defaults. A value that is not a
    /// non-negative integer is rejected rather than silently defaulted.
    pub fn parse(
        offset: Option<&str>,
        limit: Option<&str>,
        tag: Option<&str>,
    ) -> Result<Self, CoreError> {
        let defaults = Self::default();
        Ok(Self {
            offset: parse_count("offset", offset)?.unwrap_or(defaults.offset),
            limit: parse_count("limit", limit)?.unwrap_or(defaults.limit),
            tag: tag.filter(|t| !t.is_empty()).map(str::to_string),
        })
    }
}

fn parse_count(name: &str, raw: Option<&str>) -> Result<Option<i64>, CoreError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    match raw.parse::<i64>() {
        Ok(n) if n >= 0 => Ok(Some(n)),
        _ => Err(CoreError::Validation(format!(
            "{name} must be a non-negative integer, got '{raw}'"
        ))),
    }
}
