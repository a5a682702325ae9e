use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use gig_earnings::{build_router, config::AppConfig, services::store::MemoryStore, AppState};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

pub const KEY: &str = "platforms";

/// Router over a fresh in-memory store, returning the store for inspection
pub fn memory_app() -> (Router, Arc<MemoryStore>) {
    memory_app_with(MemoryStore::new())
}

pub fn memory_app_with(store: MemoryStore) -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(store);
    let state = AppState::new(store.clone(), KEY);
    (build_router(state), store)
}

/// Router over a migrated in-memory SQLite database
#[allow(dead_code)]
pub async fn sqlite_app() -> Router {
    let config = AppConfig::from_lookup(|name| match name {
        "DATABASE_URL" => Some("sqlite::memory:".to_string()),
        _ => None,
    })
    .expect("valid test config");

    let state = AppState::from_config(&config)
        .await
        .expect("Failed to open test database");
    build_router(state)
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}
