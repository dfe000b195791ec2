// ABOUTME: Patient records route handlers proxying the clinic's Feegow charts
// ABOUTME: Search, lookup, registration, plan upload and chart file listing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Patient records routes
//!
//! Every handler fails with `EXTERNAL_SERVICE_UNAVAILABLE` (502) when no
//! records credentials are configured. Names and CPFs are masked in logs.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::constants::endpoints::PATIENTS;
use crate::constants::services::FEEGOW;
use crate::errors::{AppError, AppResult};
use crate::external::{DocumentUpload, NewPatient, PatientQuery, DEFAULT_DOCUMENT_DESCRIPTION};
use crate::middleware::{mask_cpf, mask_email, mask_name};
use crate::server::AppState;

/// Body of `POST /api/pacientes/:id/dieta`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadDietRequest {
    /// Plan document
    pub markdown: String,
    /// File name; defaults to `Dieta_{id}_{YYYY-MM-DD}.md`
    #[serde(default)]
    pub filename: Option<String>,
    /// Chart description
    #[serde(default, rename = "descricao")]
    pub description: Option<String>,
}

impl UploadDietRequest {
    fn into_document(self, patient_id: u64) -> AppResult<DocumentUpload> {
        if self.markdown.trim().is_empty() {
            return Err(AppError::invalid_input("markdown must not be empty"));
        }
        let filename = self
            .filename
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| {
                format!(
                    "Dieta_{patient_id}_{}.md",
                    Local::now().date_naive().format("%Y-%m-%d")
                )
            });
        Ok(DocumentUpload {
            filename,
            content: self.markdown,
            description: self
                .description
                .unwrap_or_else(|| DEFAULT_DOCUMENT_DESCRIPTION.to_owned()),
        })
    }
}

/// Patient records routes
pub struct RecordsRoutes;

impl RecordsRoutes {
    /// Create the patient records routes
    pub fn routes(state: Arc<AppState>) -> Router {
        Router::new()
            .route(PATIENTS, get(Self::handle_search).post(Self::handle_create))
            .route(&format!("{PATIENTS}/:id"), get(Self::handle_get))
            .route(&format!("{PATIENTS}/:id/dieta"), post(Self::handle_upload))
            .route(&format!("{PATIENTS}/:id/arquivos"), get(Self::handle_files))
            .with_state(state)
    }

    fn ensure_configured(state: &AppState) -> AppResult<()> {
        if state.records.is_configured() {
            Ok(())
        } else {
            Err(AppError::external_unavailable(FEEGOW, "FEEGOW não configurado"))
        }
    }

    async fn handle_search(
        State(state): State<Arc<AppState>>,
        Query(query): Query<PatientQuery>,
    ) -> AppResult<Response> {
        Self::ensure_configured(&state)?;
        info!(
            name = ?query.name.as_deref().map(|n| mask_name(n, &state.redaction)),
            cpf = ?query.cpf.as_deref().map(|c| mask_cpf(c, &state.redaction)),
            chart = ?query.chart_number,
            "patient search"
        );

        let patients = state.records.search_patients(&query).await?;
        let response = json!({
            "success": true,
            "total": patients.len(),
            "pacientes": patients,
        });
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    async fn handle_get(
        State(state): State<Arc<AppState>>,
        Path(id): Path<u64>,
    ) -> AppResult<Response> {
        Self::ensure_configured(&state)?;
        let patient = state.records.get_patient(id).await?;
        Ok((StatusCode::OK, Json(json!({ "success": true, "paciente": patient }))).into_response())
    }

    async fn handle_create(
        State(state): State<Arc<AppState>>,
        Json(patient): Json<NewPatient>,
    ) -> AppResult<Response> {
        Self::ensure_configured(&state)?;
        if patient.name.trim().is_empty() {
            return Err(AppError::invalid_input("nome must not be empty"));
        }
        info!(
            name = %mask_name(&patient.name, &state.redaction),
            email = ?patient.email.as_deref().map(|e| mask_email(e, &state.redaction)),
            "registering patient"
        );

        let id = state.records.create_patient(&patient).await?;
        Ok((
            StatusCode::CREATED,
            Json(json!({ "success": true, "paciente_id": id })),
        )
            .into_response())
    }

    async fn handle_upload(
        State(state): State<Arc<AppState>>,
        Path(id): Path<u64>,
        Json(request): Json<UploadDietRequest>,
    ) -> AppResult<Response> {
        Self::ensure_configured(&state)?;
        let document = request.into_document(id)?;
        state.records.upload_document(id, &document).await?;
        info!(patient_id = id, filename = %document.filename, "plan attached to chart");

        Ok((
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "paciente_id": id,
                "filename": document.filename,
            })),
        )
            .into_response())
    }

    async fn handle_files(
        State(state): State<Arc<AppState>>,
        Path(id): Path<u64>,
    ) -> AppResult<Response> {
        Self::ensure_configured(&state)?;
        let files = state.records.list_documents(id).await?;
        let response = json!({
            "success": true,
            "total": files.len(),
            "arquivos": files,
        });
        Ok((StatusCode::OK, Json(response)).into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_defaults() {
        let request = UploadDietRequest {
            markdown: "# Plano".to_owned(),
            filename: None,
            description: None,
        };
        let document = request.into_document(101).unwrap();
        assert!(document.filename.starts_with("Dieta_101_"));
        assert_eq!(document.description, DEFAULT_DOCUMENT_DESCRIPTION);
    }

    #[test]
    fn test_upload_rejects_empty_markdown() {
        let request = UploadDietRequest {
            markdown: "  ".to_owned(),
            filename: None,
            description: None,
        };
        assert!(request.into_document(101).is_err());
    }
}
