// ABOUTME: HTTP-level tests for health, generation, preview, complexity, stats and config routes
// ABOUTME: Drives the assembled router with tower oneshot requests and in-memory state
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use nutriplan_server::{
    config::ServerConfig,
    constants::service::SERVICE_VERSION,
    external::MockPatientRecords,
    generation::TextGenerator,
    server::{router, AppState},
};
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;

fn app(state: Arc<AppState>) -> Router {
    router(state, &ServerConfig::default())
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn reference_body() -> Value {
    json!({
        "nome": "Maria Aparecida Silva",
        "sexo": "F",
        "idade": 45,
        "peso": 80.0,
        "altura": 165.0,
        "hba1c": 9.5,
        "tipo_dieta": "personalizado",
        "nivel_deficit": "moderado"
    })
}

// ============================================================================
// HEALTH
// ============================================================================

#[tokio::test]
async fn test_health_reports_local_only_service() {
    let (status, body) = send(app(common::default_state()), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["api_available"], false);
    assert_eq!(body["default_mode"], "auto");
    assert_eq!(body["version"], SERVICE_VERSION);
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_health_reports_generator() {
    let stub: Arc<dyn TextGenerator> = Arc::new(common::StubGenerator::new("x", 1));
    let state = common::test_state(
        common::test_orchestrator(Some(stub), 1),
        Arc::new(MockPatientRecords::new()),
    );
    let (_, body) = send(app(state), get("/health")).await;
    assert_eq!(body["api_available"], true);
}

// ============================================================================
// GENERATION
// ============================================================================

#[tokio::test]
async fn test_generate_returns_document_and_metadata() {
    let state = common::default_state();
    let (status, body) = send(
        app(state.clone()),
        post_json("/gerar-dieta?mode=python_only", &reference_body()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["markdown"]
        .as_str()
        .unwrap()
        .starts_with("# PLANO ALIMENTAR PERSONALIZADO"));
    let filename = body["filename"].as_str().unwrap();
    assert!(filename.starts_with("Dieta_Maria_Aparecida_Silva_"));
    assert!(filename.ends_with(".md"));

    let meta = &body["metadata"];
    assert_eq!(meta["mode_used"], "python_only");
    assert_eq!(meta["requested_mode"], "python_only");
    assert_eq!(meta["fell_back"], false);
    assert_eq!(meta["complexity_score"], 1);
    assert_eq!(meta["tmb"], 1445.0);
    assert_eq!(meta["meta_calorica"], 1590.0);

    let stats = state.orchestrator.usage().all_time_stats().await;
    assert_eq!(stats.total_diets, 1);
}

#[tokio::test]
async fn test_generate_without_mode_uses_default() {
    let (status, body) = send(
        app(common::default_state()),
        post_json("/gerar-dieta", &reference_body()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metadata"]["requested_mode"], "auto");
    assert_eq!(body["metadata"]["mode_used"], "python_only");
}

#[tokio::test]
async fn test_generate_rejects_unknown_mode() {
    let state = common::default_state();
    let (status, body) = send(
        app(state.clone()),
        post_json("/gerar-dieta?mode=turbo", &reference_body()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
    assert_eq!(state.orchestrator.usage().all_time_stats().await.total_diets, 0);
}

#[tokio::test]
async fn test_generate_rejects_out_of_range_patient() {
    let mut patient = reference_body();
    patient["idade"] = json!(7);
    let (status, body) = send(
        app(common::default_state()),
        post_json("/gerar-dieta", &patient),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALUE_OUT_OF_RANGE");
}

// ============================================================================
// PREVIEW AND COMPLEXITY
// ============================================================================

#[tokio::test]
async fn test_preview_reference_values() {
    let (status, body) = send(
        app(common::default_state()),
        get("/api/calcular-preview?peso=80&altura=165&idade=45&sexo=F&cintura=95"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tmb"], 1445.0);
    assert_eq!(body["imc"], 29.4);
    assert_eq!(body["classificacao_imc"], "Sobrepeso");
    assert_eq!(body["necessidade_calorica"], 1987.0);
    assert_eq!(body["meta_calorica"], 1590.0);
    assert_eq!(body["nivel_deficit"], "moderado");
    assert_eq!(body["suggested_objective"], "Perda de peso leve");
    assert_eq!(body["risco_cardiovascular"]["relacao_cintura_altura"], 0.58);
    assert_eq!(body["agua_litros"], 2.8);
}

#[tokio::test]
async fn test_preview_without_waist_has_no_risk() {
    let (status, body) = send(
        app(common::default_state()),
        get("/api/calcular-preview?peso=80&altura=165&idade=45&sexo=M&nivel_deficit=leve"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["risco_cardiovascular"].is_null());
    assert_eq!(body["nivel_deficit"], "leve");
}

#[tokio::test]
async fn test_preview_rejects_unknown_sex() {
    let (status, body) = send(
        app(common::default_state()),
        get("/api/calcular-preview?peso=80&altura=165&idade=45&sexo=X"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_analyze_complexity_for_complex_patient() {
    let body = json!({
        "nome": "João Pereira Santos",
        "sexo": "M",
        "idade": 78,
        "peso": 130.0,
        "altura": 170.0,
        "hba1c": 11.0,
        "cintura": 130.0
    });
    let (status, body) = send(
        app(common::default_state()),
        post_json("/api/analyze-complexity", &body),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["score"], 6);
    assert_eq!(body["recommendation"], "api_minimal");
    assert_eq!(body["factors"].as_array().unwrap().len(), 4);
    assert_eq!(body["estimated_cost"]["api_minimal"], 0.015);
    assert!(body["patient_summary"]
        .as_str()
        .unwrap()
        .contains("João Pereira Santos"));
}

// ============================================================================
// STATS AND CONFIG
// ============================================================================

#[tokio::test]
async fn test_stats_all_time_by_default() {
    let state = common::default_state();
    state
        .orchestrator
        .generate(&common::reference_patient(), None)
        .await
        .unwrap();

    let (status, body) = send(app(state), get("/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["period"], "all_time");
    assert_eq!(body["stats"]["total_diets"], 1);
    assert_eq!(body["stats"]["by_mode"]["python_only"]["count"], 1);
}

#[tokio::test]
async fn test_stats_for_month() {
    let (status, body) = send(app(common::default_state()), get("/stats?month=3&year=2025")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["period"], "2025-03");
    assert_eq!(body["stats"]["total_diets"], 0);
}

#[tokio::test]
async fn test_stats_rejects_out_of_range_period() {
    for uri in ["/stats?month=13&year=2025", "/stats?month=1&year=2031"] {
        let (status, body) = send(app(common::default_state()), get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["error"]["code"], "VALUE_OUT_OF_RANGE");
    }
}

#[tokio::test]
async fn test_config_exposes_routing_settings() {
    let (status, body) = send(app(common::default_state()), get("/config")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["default_mode"], "auto");
    assert_eq!(body["complexity_thresholds"]["simple"], 3);
    assert_eq!(body["complexity_thresholds"]["medium"], 6);
    assert_eq!(body["costs"]["api_full"], 0.048);
    assert_eq!(body["api_available"], false);
    assert!(body["api_model"].is_null());
}
