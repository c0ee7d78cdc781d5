//! Product row and result shapes.

use catalog_core::product::{ProductDocument, ProductFields};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `products` table. The id lives in its own column; every
/// other field is in the `doc` JSONB column.
#[derive(Debug, FromRow)]
pub struct ProductRow {
    pub id: String,
    pub doc: Json<ProductFields>,
}

impl From<ProductRow> for ProductDocument {
    fn from(row: ProductRow) -> Self {
        ProductDocument {
            id: row.id,
            fields: row.doc.0,
        }
    }
}

/// Outcome of a delete. Deleting an id that does not exist is acknowledged
/// with a count of zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteResult {
    pub fn removed(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }
}
