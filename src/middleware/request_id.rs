// ABOUTME: Request ID middleware for correlation and structured request logging
// ABOUTME: Reuses or generates x-request-id, runs the request in a span and logs its outcome
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use http::{HeaderName, HeaderValue};
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::logging::AppLogger;

/// Header carrying the correlation id
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Correlation id of the current request, available as an extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    /// Fresh id
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("req_{}", Uuid::new_v4().simple()))
    }

    /// Id as text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Attach a request id, log the request and echo the id in the response
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= 128)
        .map_or_else(RequestId::generate, |v| RequestId(v.to_owned()));

    let method = request.method().to_string();
    let path = request.uri().path().to_owned();
    request.extensions_mut().insert(request_id.clone());

    let span = info_span!(
        "http_request",
        method = %method,
        path = %path,
        request_id = %request_id.as_str(),
    );

    let started = Instant::now();
    let mut response = next.run(request).instrument(span).await;

    AppLogger::log_http_request(
        &method,
        &path,
        response.status().as_u16(),
        u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        Some(request_id.as_str()),
    );

    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = RequestId::generate();
        let b = RequestId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("req_"));
    }
}
