// ABOUTME: Plan generation route handler
// ABOUTME: Parses the requested mode, runs the hybrid router and names the output file
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::constants::endpoints::GENERATE_DIET;
use crate::errors::AppResult;
use crate::generation::GenerationMetadata;
use crate::middleware::mask_name;
use crate::models::{GenerationStrategy, PatientProfile};
use crate::server::AppState;

/// Query string of `POST /gerar-dieta`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateQuery {
    /// `python_only`, `auto`, `api_minimal` or `api_full`; absent uses the default
    pub mode: Option<String>,
}

impl GenerateQuery {
    /// Requested strategy, if any
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` listing the valid modes for an unknown value.
    pub fn strategy(&self) -> AppResult<Option<GenerationStrategy>> {
        self.mode
            .as_deref()
            .map(str::trim)
            .filter(|mode| !mode.is_empty())
            .map(str::parse)
            .transpose()
    }
}

/// Body of a successful generation
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateDietResponse {
    /// Always `true`; failures use the error body
    pub success: bool,
    /// Complete plan document
    pub markdown: String,
    /// Suggested download name
    pub filename: String,
    /// Routing and nutrition metadata
    pub metadata: GenerationMetadata,
}

/// `Dieta_{name with underscores, no dots}_{YYYY-MM-DD}.md`
#[must_use]
pub fn diet_filename(patient_name: &str, date: NaiveDate) -> String {
    let clean = patient_name.replace(' ', "_").replace('.', "");
    format!("Dieta_{clean}_{}.md", date.format("%Y-%m-%d"))
}

/// Plan generation routes
pub struct DietRoutes;

impl DietRoutes {
    /// Create the generation route
    pub fn routes(state: Arc<AppState>) -> Router {
        Router::new()
            .route(GENERATE_DIET, post(Self::handle_generate))
            .with_state(state)
    }

    async fn handle_generate(
        State(state): State<Arc<AppState>>,
        Query(query): Query<GenerateQuery>,
        Json(patient): Json<PatientProfile>,
    ) -> AppResult<Response> {
        let requested = query.strategy()?;
        info!(
            patient = %mask_name(&patient.name, &state.redaction),
            requested = ?requested,
            "plan generation requested"
        );

        let outcome = state.orchestrator.generate(&patient, requested).await?;
        let response = GenerateDietResponse {
            success: true,
            markdown: outcome.document,
            filename: diet_filename(&patient.name, Local::now().date_naive()),
            metadata: outcome.metadata,
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_strips_spaces_and_dots() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        assert_eq!(
            diet_filename("Maria A. Silva", date),
            "Dieta_Maria_A_Silva_2025-01-15.md"
        );
    }

    #[test]
    fn test_empty_mode_is_default() {
        let query = GenerateQuery {
            mode: Some("  ".to_owned()),
        };
        assert_eq!(query.strategy().unwrap(), None);
        assert!(GenerateQuery::default().strategy().unwrap().is_none());
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let query = GenerateQuery {
            mode: Some("turbo".to_owned()),
        };
        assert!(query.strategy().is_err());
    }
}
