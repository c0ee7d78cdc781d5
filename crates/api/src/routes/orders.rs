//! Route definitions for orders. Routed, but without a backing store.

use axum::routing::get;
use axum::Router;

use crate::handlers::orders::orders_not_implemented;
use crate::state::AppState;

/// Order routes mounted at `/orders`.
///
/// ```text
/// GET, POST           /
/// GET, PUT, DELETE    /{id}
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(orders_not_implemented).post(orders_not_implemented),
        )
        .route(
            "/{id}",
            get(orders_not_implemented)
                .put(orders_not_implemented)
                .delete(orders_not_implemented),
        )
}
