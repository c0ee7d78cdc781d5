//! Order routes. They are routed so clients get a definite answer, but no
//! order store exists, so every verb answers 501.

use crate::error::AppError;

/// Any verb on `/orders` or `/orders/{id}`.
pub async fn orders_not_implemented() -> AppError {
    AppError::NotImplemented("Orders")
}
