#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use catalog_api::config::{CorsOrigins, ServerConfig};
use catalog_api::router::build_app_router;
use catalog_api::state::AppState;
use catalog_db::store::MemoryProductStore;

/// Build a test `ServerConfig` with safe defaults.
///
/// Serves static assets from the workspace `public/` directory.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: CorsOrigins::Any,
        request_timeout_secs: 30,
        body_limit_bytes: 100 * 1024,
        static_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../../public")),
    }
}

/// Build the full application router over the given in-memory store.
///
/// Uses the same `build_app_router` as `main.rs`, so tests exercise the
/// production middleware stack.
pub fn build_test_app(store: Arc<MemoryProductStore>) -> Router {
    build_app_router(AppState::new(store, test_config())).unwrap()
}

/// A fresh store and an app over it. Keep the store to inspect or seed it.
pub fn fresh_app() -> (Router, Arc<MemoryProductStore>) {
    let store = Arc::new(MemoryProductStore::new());
    (build_test_app(Arc::clone(&store)), store)
}

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    send(app, Request::delete(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::POST, uri, body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::PUT, uri, body)).await
}

pub fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// The product from the end-to-end scenario: every required field, one tag.
pub fn sample_product() -> serde_json::Value {
    serde_json::json!({
        "likes": 0,
        "urls": {"regular": "a", "small": "b", "thumb": "c"},
        "links": {"self": "s", "html": "h"},
        "user": {"id": "u1", "first_name": "F", "username": "f"},
        "tags": [{"title": "nature"}]
    })
}
