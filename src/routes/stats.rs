// ABOUTME: Usage statistics and runtime configuration route handlers
// ABOUTME: Monthly or all-time generation counts and costs, plus thresholds and prices in use
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, to_value, Value};

use crate::constants::endpoints::{CONFIG, STATS};
use crate::errors::{AppError, AppResult};
use crate::server::AppState;

/// Years accepted by the monthly filter
pub const STATS_YEAR_RANGE: (i32, i32) = (2024, 2030);

/// Query string of `GET /stats`
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct StatsQuery {
    /// Month, 1-12
    pub month: Option<u32>,
    /// Year, 2024-2030
    pub year: Option<i32>,
}

impl StatsQuery {
    /// Month and year when both are given
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` for a month outside 1-12 or a year outside
    /// the accepted range.
    pub fn period(self) -> AppResult<Option<(i32, u32)>> {
        if let Some(month) = self.month {
            if !(1..=12).contains(&month) {
                return Err(AppError::value_out_of_range(
                    "month",
                    1.0,
                    12.0,
                    f64::from(month),
                ));
            }
        }
        if let Some(year) = self.year {
            let (min, max) = STATS_YEAR_RANGE;
            if !(min..=max).contains(&year) {
                return Err(AppError::value_out_of_range(
                    "year",
                    f64::from(min),
                    f64::from(max),
                    f64::from(year),
                ));
            }
        }
        Ok(self.year.zip(self.month))
    }
}

/// Statistics and configuration routes
pub struct StatsRoutes;

impl StatsRoutes {
    /// Create the stats and config routes
    pub fn routes(state: Arc<AppState>) -> Router {
        Router::new()
            .route(STATS, get(Self::handle_stats))
            .route(CONFIG, get(Self::handle_config))
            .with_state(state)
    }

    async fn handle_stats(
        State(state): State<Arc<AppState>>,
        Query(query): Query<StatsQuery>,
    ) -> AppResult<Response> {
        let usage = state.orchestrator.usage();
        let (period, stats) = match query.period()? {
            Some((year, month)) => (
                format!("{year}-{month:02}"),
                to_value(usage.monthly_stats(year, month).await)?,
            ),
            None => ("all_time".to_owned(), to_value(usage.all_time_stats().await)?),
        };
        Ok((StatusCode::OK, Json(json!({ "period": period, "stats": stats }))).into_response())
    }

    async fn handle_config(State(state): State<Arc<AppState>>) -> Json<Value> {
        let orchestrator = &state.orchestrator;
        let thresholds = orchestrator.analyzer().config();
        Json(json!({
            "default_mode": orchestrator.default_strategy(),
            "complexity_thresholds": {
                "simple": thresholds.simple_threshold,
                "medium": thresholds.medium_threshold,
            },
            "costs": orchestrator.prices(),
            "api_available": orchestrator.api_available(),
            "api_model": orchestrator.api_model(),
        }))
    }
}
