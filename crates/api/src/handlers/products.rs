//! Handlers for the product catalog.
//!
//! Each handler extracts path/query/body input, delegates to [`ProductRepo`]
//! and maps the outcome to a status code. Bodies are taken as raw JSON and
//! decoded by the domain types so type mismatches surface as validation
//! errors. Extractor rejections are taken as `Result` so they reach the
//! client in the standard error envelope.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use catalog_core::error::CoreError;
use catalog_core::product::{NewProduct, ProductPatch, PRODUCT_ENTITY};
use catalog_db::repositories::ProductRepo;

use crate::error::{AppError, AppResult};
use crate::query::ListProductsParams;
use crate::state::AppState;

/// GET /products
///
/// List products ordered by id. Supports `offset`, `limit` and `tag`.
pub async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<ListProductsParams>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let Query(params) = query?;
    let options = params.to_options()?;
    let products = ProductRepo::list(state.store.as_ref(), &options).await?;

    Ok(Json(products))
}

/// GET /products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(id) = path?;
    let product = ProductRepo::get(state.store.as_ref(), &id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: PRODUCT_ENTITY,
                id: id.clone(),
            })
        })?;

    Ok(Json(product))
}

/// POST /products
///
/// Create a product. An id is generated when the body has none.
pub async fn create_product(
    State(state): State<AppState>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(body) = body?;
    let input = NewProduct::from_json(body)?;
    let product = ProductRepo::create(state.store.as_ref(), input).await?;

    tracing::info!(product_id = %product.id, "Product created");

    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /products/{id}
///
/// Shallow-merge the body into the stored product. Keys present in the body
/// replace whole top-level fields; absent keys are left untouched.
pub async fn edit_product(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(id) = path?;
    let Json(body) = body?;
    let patch = ProductPatch::from_json(body)?;
    let product = ProductRepo::edit(state.store.as_ref(), &id, patch).await?;

    tracing::info!(product_id = %product.id, "Product updated");

    Ok(Json(product))
}

/// DELETE /products/{id}
///
/// Always succeeds; the body reports how many records were removed.
pub async fn delete_product(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(id) = path?;
    let result = ProductRepo::destroy(state.store.as_ref(), &id).await?;

    tracing::info!(product_id = %id, deleted_count = result.deleted_count, "Product deleted");

    Ok(Json(result))
}
