//! PostgreSQL record store: one JSONB document per product.

use async_trait::async_trait;
use catalog_core::product::ProductDocument;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::error::StoreError;
use crate::models::product::ProductRow;
use crate::store::{ProductFilter, ProductQuery, ProductStore};

/// Column list for `products` queries.
const COLUMNS: &str = "id, doc";

/// Byte-wise id ordering, independent of the database locale.
const ORDER_BY_ID: &str = "ORDER BY id COLLATE \"C\" ASC";

/// PostgreSQL unique-violation SQLSTATE.
const UNIQUE_VIOLATION: &str = "23505";

/// Record store backed by the `products` table.
#[derive(Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn ping(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)
    }

    async fn find(&self, query: &ProductQuery) -> Result<Vec<ProductDocument>, StoreError> {
        let rows = match &query.filter {
            ProductFilter::All => {
                let sql = format!("SELECT {COLUMNS} FROM products {ORDER_BY_ID} OFFSET $1 LIMIT $2");
                sqlx::query_as::<_, ProductRow>(&sql)
                    .bind(query.skip)
                    .bind(query.take)
                    .fetch_all(&self.pool)
                    .await
            }
            ProductFilter::TagTitle(title) => {
                let sql = format!(
                    "SELECT {COLUMNS} FROM products \
                     WHERE doc -> 'tags' @> jsonb_build_array(jsonb_build_object('title', $3::text)) \
                     {ORDER_BY_ID} OFFSET $1 LIMIT $2"
                );
                sqlx::query_as::<_, ProductRow>(&sql)
                    .bind(query.skip)
                    .bind(query.take)
                    .bind(title)
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(StoreError::from_sqlx)?;

        Ok(rows.into_iter().map(ProductDocument::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ProductDocument>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM products WHERE id = $1");
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)?;
        Ok(row.map(ProductDocument::from))
    }

    async fn insert(&self, doc: &ProductDocument) -> Result<ProductDocument, StoreError> {
        let sql = format!("INSERT INTO products (id, doc) VALUES ($1, $2) RETURNING {COLUMNS}");
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(&doc.id)
            .bind(Json(&doc.fields))
            .fetch_one(&self.pool)
            .await
            .map_err(|err| {
                let duplicate = matches!(
                    &err,
                    sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
                );
                if duplicate {
                    StoreError::DuplicateId(doc.id.clone())
                } else {
                    StoreError::from_sqlx(err)
                }
            })?;
        Ok(row.into())
    }

    async fn replace(&self, doc: &ProductDocument) -> Result<Option<ProductDocument>, StoreError> {
        let sql = format!("UPDATE products SET doc = $2 WHERE id = $1 RETURNING {COLUMNS}");
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(&doc.id)
            .bind(Json(&doc.fields))
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)?;
        Ok(row.map(ProductDocument::from))
    }

    async fn delete(&self, id: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)?;
        Ok(result.rows_affected())
    }
}
