// ABOUTME: Tests for request id propagation through the assembled router
// ABOUTME: Generated ids, echoed client ids, oversize ids and the handler extension
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use axum::{
    body::{to_bytes, Body},
    http::{Request as HttpRequest, StatusCode},
    middleware,
    routing::get,
    Extension, Router,
};
use nutriplan_server::{
    config::ServerConfig,
    middleware::{request_id_middleware, RequestId, REQUEST_ID_HEADER},
    server::router,
};
use tower::ServiceExt;

mod common;

async fn echo_request_id(Extension(request_id): Extension<RequestId>) -> String {
    request_id.as_str().to_owned()
}

fn echo_app() -> Router {
    Router::new()
        .route("/echo", get(echo_request_id))
        .layer(middleware::from_fn(request_id_middleware))
}

#[tokio::test]
async fn test_generated_id_on_every_response() {
    let app = router(common::default_state(), &ServerConfig::default());
    let response = app
        .oneshot(HttpRequest::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let id = response.headers()[&REQUEST_ID_HEADER].to_str().unwrap();
    assert!(id.starts_with("req_"));
    assert_eq!(id.len(), "req_".len() + 32);
}

#[tokio::test]
async fn test_client_id_is_echoed() {
    let app = router(common::default_state(), &ServerConfig::default());
    let response = app
        .oneshot(
            HttpRequest::builder()
                .uri("/health")
                .header(&REQUEST_ID_HEADER, "client-abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()[&REQUEST_ID_HEADER], "client-abc-123");
}

#[tokio::test]
async fn test_oversize_client_id_is_replaced() {
    let response = echo_app()
        .oneshot(
            HttpRequest::builder()
                .uri("/echo")
                .header(&REQUEST_ID_HEADER, "x".repeat(200))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let header = response.headers()[&REQUEST_ID_HEADER].to_str().unwrap().to_owned();
    assert!(header.starts_with("req_"));

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(std::str::from_utf8(&body).unwrap(), header);
}

#[tokio::test]
async fn test_handler_sees_same_id_as_header() {
    let response = echo_app()
        .oneshot(
            HttpRequest::builder()
                .uri("/echo")
                .header(&REQUEST_ID_HEADER, "trace-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"trace-42");
}
