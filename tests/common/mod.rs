//! Shared utilities for integration tests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use contacts_api::{ApiConfig, ContactStore, HttpServer, InMemoryContactStore};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const BOUNDARY: &str = "contacts-test-boundary";

/// Build the fully layered app over a fresh in-memory store.
pub fn app() -> (Router, InMemoryContactStore) {
    let store = InMemoryContactStore::default();
    (app_with_store(Arc::new(store.clone())), store)
}

/// Build the fully layered app over any store.
pub fn app_with_store(store: Arc<dyn ContactStore>) -> Router {
    app_with_config(ApiConfig::default(), store)
}

/// Build the fully layered app with a custom configuration.
pub fn app_with_config(config: ApiConfig, store: Arc<dyn ContactStore>) -> Router {
    HttpServer::new(config, store).router()
}

/// A response reduced to what the tests inspect.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Send a request through the router in-process.
pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    TestResponse {
        status,
        headers,
        body,
    }
}

/// A request without a body.
pub fn empty(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// A request with a multipart form body.
pub fn form(method: Method, uri: &str, fields: &[(&str, &str)]) -> Request<Body> {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));

    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Create a contact through the API and return its JSON.
pub async fn create(app: &Router, fields: &[(&str, &str)]) -> Value {
    let res = send(app, form(Method::POST, "/api/v1/contacts", fields)).await;
    assert_eq!(res.status, StatusCode::CREATED, "create failed: {}", res.body);
    res.body["data"]["contacts"][0].clone()
}
