#![allow(dead_code)]

//! Test infrastructure for relay-server API tests

use relay_config::AuthConfig;
use relay_db::{DEFAULT_SEARCH_LIMIT, SqliteStore, open_in_memory_pool};
use relay_ws::{AppState, Broker, BrokerConfig, ConnectionConfig};

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

pub const TEST_KEY: &str = "producer";
pub const TEST_SECRET: &str = "s3cret";

/// Broadcast-only AppState, auth disabled
pub fn create_test_app_state() -> AppState {
    AppState::new(
        Broker::without_persistence(BrokerConfig::default()),
        ConnectionConfig::default(),
        AuthConfig::disabled(),
    )
}

/// AppState backed by an in-memory SQLite store, auth disabled
pub async fn create_persistent_app_state() -> AppState {
    let pool = open_in_memory_pool()
        .await
        .expect("Failed to create test pool");
    AppState::new(
        Broker::new(
            Arc::new(SqliteStore::new(pool, DEFAULT_SEARCH_LIMIT)),
            BrokerConfig::default(),
        ),
        ConnectionConfig::default(),
        AuthConfig::disabled(),
    )
}

pub fn with_auth(mut state: AppState) -> AppState {
    state.auth = AuthConfig {
        enabled: true,
        key: Some(TEST_KEY.to_string()),
        secret: Some(TEST_SECRET.to_string()),
    };
    state
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn raw_request(method: &str, uri: &str, body: &'static str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Send one request through a fresh router over `state`
pub async fn send(state: &AppState, request: Request<Body>) -> (StatusCode, Value) {
    let app: Router = relay_server::build_router(state.clone());
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}
