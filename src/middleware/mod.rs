// ABOUTME: HTTP middleware for the meal plan API
// ABOUTME: CORS setup, request correlation ids and PII-safe logging helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// CORS configuration
pub mod cors;
/// PII redaction for log output
pub mod redaction;
/// Request id propagation and request logging
pub mod request_id;

pub use cors::setup_cors;
pub use redaction::{mask_cpf, mask_email, mask_name, RedactionConfig};
pub use request_id::{request_id_middleware, RequestId, REQUEST_ID_HEADER};
