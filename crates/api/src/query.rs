//! Query parameter types for API handlers.

use catalog_core::error::CoreError;
use catalog_core::listing::ListOptions;
use serde::Deserialize;

/// Query parameters for `GET /products` (`?offset=&limit=&tag=`).
///
/// Kept as raw strings so an unparseable number is reported as a validation
/// error instead of an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ListProductsParams {
    pub offset: Option<String>,
    pub limit: Option<String>,
    pub tag: Option<String>,
}

impl ListProductsParams {
    pub fn to_options(&self) -> Result<ListOptions, CoreError> {
        ListOptions::parse(
            self.offset.as_deref(),
            self.limit.as_deref(),
            self.tag.as_deref(),
        )
    }
}
