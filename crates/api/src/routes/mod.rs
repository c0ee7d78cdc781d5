pub mod health;
pub mod orders;
pub mod products;

use axum::Router;

use crate::state::AppState;

/// Build the API route tree.
///
/// Route hierarchy:
///
/// ```text
/// /                        root greeting (GET)
/// /health                  service and store health (GET)
///
/// /products                list, create
/// /products/{id}           get, edit (PUT), delete
///
/// /orders                  list, create          (501)
/// /orders/{id}             get, edit, delete     (501)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/products", products::router())
        .nest("/orders", orders::router())
}
