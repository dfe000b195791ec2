// ABOUTME: Tests for the Feegow records client against a local fake API
// ABOUTME: Token header, response mapping, create and upload payloads and error translation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//! The fake API is a small axum app bound to an ephemeral local port.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::sync::{Arc, Mutex};

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use nutriplan_server::{
    config::FeegowConfig,
    errors::ErrorCode,
    external::{DocumentUpload, FeegowClient, NewPatient, PatientQuery, PatientRecords},
};
use serde_json::{json, Value};
use std::collections::HashMap;
use tokio::net::TcpListener;

mod common;

const TOKEN: &str = "test-token";

#[derive(Default)]
struct FakeFeegow {
    last_query: Mutex<HashMap<String, String>>,
    posted: Mutex<Vec<Value>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers.get("x-access-token").and_then(|v| v.to_str().ok()) == Some(TOKEN)
}

async fn search(
    State(fake): State<Arc<FakeFeegow>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "success": false })));
    }
    *fake.last_query.lock().unwrap() = params;
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "content": [
                { "id": "42", "local_id": 7, "nome": "Ana Souza", "sexo": "Feminino", "peso": "61,5" },
                { "id": 43, "nome": "Bruno Lima", "sexo": "Masculino", "altura": 180 }
            ]
        })),
    )
}

async fn get_patient(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    if params.get("id").map(String::as_str) == Some("42") {
        Json(json!({
            "success": true,
            "content": {
                "id": 42,
                "nome": "Ana Souza",
                "nascimento": "1990-01-01",
                "sexo": "Feminino",
                "cidade": "Goiânia",
                "numero": 100
            }
        }))
    } else {
        Json(json!({ "success": false, "content": null }))
    }
}

async fn record_post(State(fake): State<Arc<FakeFeegow>>, Json(body): Json<Value>) -> Json<Value> {
    fake.posted.lock().unwrap().push(body);
    Json(json!({ "success": true, "content": { "paciente_id": "77" } }))
}

async fn files() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded")
}

async fn start_fake() -> (Arc<FakeFeegow>, String) {
    let fake = Arc::new(FakeFeegow::default());
    let app = Router::new()
        .route("/patient/search", get(search))
        .route("/patient/get", get(get_patient))
        .route("/patient/create", post(record_post))
        .route("/patient/upload-file", post(record_post))
        .route("/patient/files", get(files))
        .with_state(fake.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (fake, format!("http://{addr}/"))
}

fn client(base_url: &str, token: Option<&str>) -> FeegowClient {
    FeegowClient::new(&FeegowConfig {
        api_token: token.map(str::to_owned),
        api_url: base_url.to_owned(),
        timeout_secs: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn test_search_maps_records_and_sends_filters() {
    common::init_test_logging();
    let (fake, url) = start_fake().await;
    let client = client(&url, Some(TOKEN));

    let patients = client
        .search_patients(&PatientQuery {
            name: Some("ana".to_owned()),
            cpf: Some(String::new()),
            ..PatientQuery::default()
        })
        .await
        .unwrap();

    assert_eq!(patients.len(), 2);
    assert_eq!(patients[0].id, 42);
    assert_eq!(patients[0].chart_number.as_deref(), Some("7"));
    assert_eq!(patients[0].weight_kg, Some(61.5));
    assert_eq!(patients[0].sex, "F");
    assert_eq!(patients[1].sex, "M");
    assert_eq!(patients[1].height_cm, Some(180.0));

    let query = fake.last_query.lock().unwrap().clone();
    assert_eq!(query.get("nome").map(String::as_str), Some("ana"));
    assert_eq!(query.get("limit").map(String::as_str), Some("20"));
    assert!(!query.contains_key("cpf"));
}

#[tokio::test]
async fn test_get_patient_includes_details() {
    let (_, url) = start_fake().await;
    let client = client(&url, Some(TOKEN));

    let patient = client.get_patient(42).await.unwrap();
    assert!(patient.age.is_some());
    let address = patient.address.unwrap();
    assert_eq!(address.city.as_deref(), Some("Goiânia"));
    assert_eq!(address.number.as_deref(), Some("100"));

    let missing = client.get_patient(1).await.unwrap_err();
    assert_eq!(missing.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_create_and_upload_payloads() {
    let (fake, url) = start_fake().await;
    let client = client(&url, Some(TOKEN));

    let id = client
        .create_patient(&NewPatient {
            name: "Carla Dias".to_owned(),
            sex: Some("f".to_owned()),
            ..NewPatient::default()
        })
        .await
        .unwrap();
    assert_eq!(id, 77);

    client
        .upload_document(77, &DocumentUpload::markdown("Dieta_Carla.md", "# Plano"))
        .await
        .unwrap();

    let posted = fake.posted.lock().unwrap().clone();
    assert_eq!(posted[0]["nome_completo"], "Carla Dias");
    assert_eq!(posted[0]["sexo_id"], 2);
    assert!(posted[0].get("cpf").is_none());

    assert_eq!(posted[1]["paciente_id"], 77);
    assert_eq!(posted[1]["nome_arquivo"], "Dieta_Carla.md");
    let decoded = STANDARD.decode(posted[1]["arquivo"].as_str().unwrap()).unwrap();
    assert_eq!(decoded, b"# Plano");
}

#[tokio::test]
async fn test_upstream_errors_are_translated() {
    let (_, url) = start_fake().await;

    let error = client(&url, Some(TOKEN)).list_documents(42).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ExternalServiceError);
    assert!(error.message.contains("500"));

    let error = client(&url, Some("wrong"))
        .search_patients(&PatientQuery::default())
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ExternalServiceError);
}

#[tokio::test]
async fn test_unconfigured_client_never_calls_out() {
    let client = client("http://127.0.0.1:9/", None);
    assert!(!client.is_configured());
    let error = client.search_patients(&PatientQuery::default()).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ExternalServiceUnavailable);
}

#[tokio::test]
async fn test_connection_refused_is_unavailable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/", listener.local_addr().unwrap());
    drop(listener);

    let error = client(&url, Some(TOKEN)).get_patient(42).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ExternalServiceUnavailable);
}
