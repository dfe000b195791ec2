// ABOUTME: Health check route handler for service monitoring
// ABOUTME: Reports generator availability, default mode and version
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use chrono::Local;
use serde_json::{json, Value};

use crate::constants::endpoints::HEALTH_CHECK;
use crate::constants::service::SERVICE_VERSION;
use crate::server::AppState;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health check route
    pub fn routes(state: Arc<AppState>) -> Router {
        Router::new()
            .route(HEALTH_CHECK, get(Self::handle_health))
            .with_state(state)
    }

    async fn handle_health(State(state): State<Arc<AppState>>) -> Json<Value> {
        Json(json!({
            "status": "ok",
            "api_available": state.orchestrator.api_available(),
            "default_mode": state.orchestrator.default_strategy(),
            "version": SERVICE_VERSION,
            "timestamp": Local::now().naive_local().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        }))
    }
}
