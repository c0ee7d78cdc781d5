//! The record store seam.
//!
//! [`ProductStore`] is what the repository talks to. Two implementations:
//! [`postgres::PgProductStore`] keeps one JSONB document per product, and
//! [`memory::MemoryProductStore`] keeps them in a map for tests and local runs.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use catalog_core::product::ProductDocument;

use crate::error::StoreError;

pub use memory::MemoryProductStore;
pub use postgres::PgProductStore;

/// Which products a query matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductFilter {
    All,
    /// Products whose `tags` contain an entry with exactly this title.
    TagTitle(String),
}

/// A find query. Matches are always ordered by id, compared byte-wise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    pub filter: ProductFilter,
    pub skip: i64,
    pub take: i64,
}

/// Persistence operations over the product collection.
///
/// Each call is one round-trip; nothing is cached between calls and no call
/// holds a lock across another. Writes to the same id race and the last one
/// to complete wins.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Confirm the store answers.
    async fn ping(&self) -> Result<(), StoreError>;

    async fn find(&self, query: &ProductQuery) -> Result<Vec<ProductDocument>, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<ProductDocument>, StoreError>;

    /// Insert a new document. Fails with [`StoreError::DuplicateId`] if the id
    /// is taken.
    async fn insert(&self, doc: &ProductDocument) -> Result<ProductDocument, StoreError>;

    /// Overwrite an existing document. Returns `None` if the id is gone.
    async fn replace(&self, doc: &ProductDocument) -> Result<Option<ProductDocument>, StoreError>;

    /// Remove a document, returning how many were removed (0 or 1).
    async fn delete(&self, id: &str) -> Result<u64, StoreError>;
}
