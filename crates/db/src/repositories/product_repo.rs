//! Repository for the product collection.
//!
//! Owns query construction, id assignment, the required-field check before
//! every write, and the fetch-merge-save sequence of an edit. The sequence is
//! not atomic: a concurrent edit of the same id can be overwritten.

use catalog_core::error::CoreError;
use catalog_core::listing::ListOptions;
use catalog_core::product::{NewProduct, ProductDocument, ProductPatch, PRODUCT_ENTITY};

use crate::error::{RepoError, StoreError};
use crate::models::product::DeleteResult;
use crate::store::{ProductFilter, ProductQuery, ProductStore};

/// Provides data access for products.
pub struct ProductRepo;

impl ProductRepo {
    /// Translate list options into a store query.
    pub fn query_for(options: &ListOptions) -> ProductQuery {
        ProductQuery {
            filter: match &options.tag {
                Some(tag) => ProductFilter::TagTitle(tag.clone()),
                None => ProductFilter::All,
            },
            skip: options.offset,
            take: options.limit,
        }
    }

    /// List products ordered by id, optionally restricted to a tag.
    pub async fn list(
        store: &dyn ProductStore,
        options: &ListOptions,
    ) -> Result<Vec<ProductDocument>, RepoError> {
        let products = store.find(&Self::query_for(options)).await?;
        tracing::debug!(
            offset = options.offset,
            limit = options.limit,
            tag = options.tag.as_deref(),
            count = products.len(),
            "Listed products",
        );
        Ok(products)
    }

    /// Find a product by id. Returns `None` if no record matches.
    pub async fn get(
        store: &dyn ProductStore,
        id: &str,
    ) -> Result<Option<ProductDocument>, RepoError> {
        Ok(store.find_by_id(id).await?)
    }

    /// Validate and persist a new product, assigning an id when absent.
    pub async fn create(
        store: &dyn ProductStore,
        input: NewProduct,
    ) -> Result<ProductDocument, RepoError> {
        let doc = input.into_document()?;
        let created = store.insert(&doc).await.map_err(|err| match err {
            StoreError::DuplicateId(id) => RepoError::Core(CoreError::Conflict(format!(
                "{PRODUCT_ENTITY} with id {id} already exists"
            ))),
            other => RepoError::Store(other),
        })?;
        tracing::debug!(product_id = %created.id, "Inserted product");
        Ok(created)
    }

    /// Shallow-merge `patch` into the stored product and save the result.
    ///
    /// Fails with `NotFound` if the id is absent (including when the record is
    /// deleted between the fetch and the save) and with `InvalidRecord` if the
    /// merged record breaks the required-field contract.
    pub async fn edit(
        store: &dyn ProductStore,
        id: &str,
        patch: ProductPatch,
    ) -> Result<ProductDocument, RepoError> {
        let current = store.find_by_id(id).await?.ok_or_else(|| not_found(id))?;
        let merged = current.apply(patch)?;
        let saved = store.replace(&merged).await?.ok_or_else(|| not_found(id))?;
        tracing::debug!(product_id = %saved.id, "Replaced product");
        Ok(saved)
    }

    /// Delete a product. Deleting an unknown id succeeds with a zero count.
    pub async fn destroy(store: &dyn ProductStore, id: &str) -> Result<DeleteResult, RepoError> {
        let deleted = store.delete(id).await?;
        tracing::debug!(product_id = %id, deleted, "Deleted product");
        Ok(DeleteResult::removed(deleted))
    }
}

fn not_found(id: &str) -> RepoError {
    RepoError::Core(CoreError::NotFound {
        entity: PRODUCT_ENTITY,
        id: id.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_option_becomes_title_filter() {
        let options = ListOptions {
            offset: 5,
            limit: 10,
            tag: Some("nature".into()),
        };

        let query = ProductRepo::query_for(&options);

        assert_eq!(query.filter, ProductFilter::TagTitle("nature".into()));
        assert_eq!(query.skip, 5);
        assert_eq!(query.take, 10);
    }

    #[test]
    fn no_tag_matches_everything() {
        let query = ProductRepo::query_for(&ListOptions::default());
        assert_eq!(query.filter, ProductFilter::All);
        assert_eq!(query.take, 25);
    }
}
