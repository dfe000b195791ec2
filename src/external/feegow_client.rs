// ABOUTME: Feegow medical-records API client for patient lookup and chart document upload
// ABOUTME: Includes an in-memory mock implementation for tests and offline development
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Feegow API Client
//!
//! Authenticates with the `x-access-token` header. Responses wrap their
//! payload in a `content` field.
//!
//! # API Reference
//! <https://docs.feegow.com/>

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{Datelike, Local, NaiveDate};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use super::{
    DocumentUpload, NewPatient, PatientAddress, PatientQuery, PatientRecord, PatientRecords,
    DEFAULT_SEARCH_LIMIT,
};
use crate::config::FeegowConfig;
use crate::constants::services::FEEGOW;
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;

const ACCESS_TOKEN_HEADER: &str = "x-access-token";

/// Envelope of every Feegow response
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    content: Option<T>,
}

/// Patient as Feegow returns it; numeric fields may arrive as strings
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPatient {
    id: Option<Value>,
    local_id: Option<Value>,
    prontuario: Option<Value>,
    nome: Option<String>,
    cpf: Option<String>,
    nascimento: Option<String>,
    sexo: Option<String>,
    celular: Option<String>,
    telefone: Option<String>,
    email: Option<String>,
    peso: Option<Value>,
    altura: Option<Value>,
    logradouro: Option<String>,
    numero: Option<Value>,
    bairro: Option<String>,
    cidade: Option<String>,
    estado: Option<String>,
    cep: Option<String>,
}

#[derive(Debug, Serialize)]
struct UploadRequest<'a> {
    paciente_id: u64,
    arquivo: String,
    nome_arquivo: &'a str,
    descricao: &'a str,
    tipo: &'static str,
}

#[derive(Debug, Serialize)]
struct CreateRequest<'a> {
    nome_completo: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    cpf: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data_nascimento: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sexo_id: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    celular: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct CreatedPatient {
    paciente_id: Value,
}

/// Non-empty text of a string or number value
fn value_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Lenient decimal parse accepting a comma separator
fn parse_decimal(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse().ok(),
        _ => None,
    }
}

fn parse_id(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Whole years between `birth` and `today`
fn age_on(birth: NaiveDate, today: NaiveDate) -> Option<u32> {
    let before_birthday = (today.month(), today.day()) < (birth.month(), birth.day());
    let years = today.year() - birth.year() - i32::from(before_birthday);
    u32::try_from(years).ok()
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|s| !s.is_empty()).cloned()
}

impl RawPatient {
    fn into_record(self, with_details: bool) -> AppResult<PatientRecord> {
        let id = parse_id(self.id.as_ref())
            .ok_or_else(|| AppError::external_service(FEEGOW, "patient without a valid id"))?;
        let sex = if self.sexo.as_deref() == Some("Masculino") {
            "M"
        } else {
            "F"
        };
        let age = if with_details {
            self.nascimento
                .as_deref()
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
                .and_then(|birth| age_on(birth, Local::now().date_naive()))
        } else {
            None
        };
        let address = with_details.then(|| PatientAddress {
            street: self.logradouro,
            number: value_text(self.numero.as_ref()),
            district: self.bairro,
            city: self.cidade,
            state: self.estado,
            postal_code: self.cep,
        });

        Ok(PatientRecord {
            id,
            chart_number: value_text(self.local_id.as_ref())
                .or_else(|| value_text(self.prontuario.as_ref())),
            name: self.nome,
            cpf: self.cpf,
            birth_date: self.nascimento,
            age,
            sex: sex.to_owned(),
            phone: non_empty(self.celular.as_ref()).or(self.telefone),
            email: self.email,
            weight_kg: parse_decimal(self.peso.as_ref()),
            height_cm: parse_decimal(self.altura.as_ref()),
            address,
        })
    }
}

/// Feegow REST client
pub struct FeegowClient {
    client: Client,
    token: Option<String>,
    base_url: String,
    timeout: Duration,
}

impl FeegowClient {
    /// Create a client; a missing token yields an unconfigured client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created
    pub fn new(config: &FeegowConfig) -> AppResult<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            token: config.api_token.clone().filter(|t| !t.is_empty()),
            base_url: config.api_url.trim_end_matches('/').to_owned(),
            timeout,
        })
    }

    fn token(&self) -> AppResult<&str> {
        self.token
            .as_deref()
            .ok_or_else(|| AppError::external_unavailable(FEEGOW, "FEEGOW não configurado"))
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.base_url)
    }

    fn transport_error(&self, e: &reqwest::Error) -> AppError {
        if e.is_timeout() {
            AppError::external_timeout(FEEGOW, self.timeout.as_secs())
        } else if e.is_connect() {
            AppError::external_unavailable(FEEGOW, format!("Failed to connect: {e}"))
        } else {
            AppError::external_service(FEEGOW, format!("Request failed: {e}"))
        }
    }

    async fn check_status(response: Response, accepted: &[StatusCode]) -> AppResult<Response> {
        let status = response.status();
        if accepted.contains(&status) {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let detail: String = body.chars().take(200).collect();
        Err(AppError::external_service(
            FEEGOW,
            format!("Erro na API: {}", status.as_u16()),
        )
        .with_details(serde_json::json!({ "status": status.as_u16(), "detail": detail })))
    }

    async fn get_content<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> AppResult<Option<T>> {
        let token = self.token()?;
        let started = Instant::now();
        let result = self
            .client
            .get(self.api_url(endpoint))
            .header(ACCESS_TOKEN_HEADER, token)
            .query(params)
            .send()
            .await;
        AppLogger::log_external_call(
            FEEGOW,
            endpoint,
            result.as_ref().is_ok_and(|r| r.status().is_success()),
            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        );

        let response = result.map_err(|e| self.transport_error(&e))?;
        let response = Self::check_status(response, &[StatusCode::OK]).await?;
        let envelope: Envelope<T> = response.json().await.map_err(|e| {
            AppError::external_service(FEEGOW, format!("JSON parse error: {e}"))
        })?;
        Ok(envelope.content)
    }

    async fn post_json<B: Serialize + Sync>(&self, endpoint: &str, body: &B) -> AppResult<Response> {
        let token = self.token()?;
        let started = Instant::now();
        let result = self
            .client
            .post(self.api_url(endpoint))
            .header(ACCESS_TOKEN_HEADER, token)
            .json(body)
            .send()
            .await;
        AppLogger::log_external_call(
            FEEGOW,
            endpoint,
            result.as_ref().is_ok_and(|r| r.status().is_success()),
            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        );

        let response = result.map_err(|e| self.transport_error(&e))?;
        Self::check_status(response, &[StatusCode::OK, StatusCode::CREATED]).await
    }
}

#[async_trait]
impl PatientRecords for FeegowClient {
    fn is_configured(&self) -> bool {
        self.token.is_some()
    }

    #[instrument(skip(self))]
    async fn search_patients(&self, query: &PatientQuery) -> AppResult<Vec<PatientRecord>> {
        let mut params = vec![(
            "limit",
            query.limit.unwrap_or(DEFAULT_SEARCH_LIMIT).to_string(),
        )];
        let filters = [
            ("nome", &query.name),
            ("cpf", &query.cpf),
            ("prontuario", &query.chart_number),
        ];
        for (key, value) in filters {
            if let Some(value) = value.as_ref().filter(|v| !v.is_empty()) {
                params.push((key, value.clone()));
            }
        }

        let raw: Vec<RawPatient> = self
            .get_content("patient/search", &params)
            .await?
            .unwrap_or_default();
        debug!(found = raw.len(), "feegow search complete");
        raw.into_iter().map(|p| p.into_record(false)).collect()
    }

    #[instrument(skip(self))]
    async fn get_patient(&self, patient_id: u64) -> AppResult<PatientRecord> {
        let raw: RawPatient = self
            .get_content("patient/get", &[("id", patient_id.to_string())])
            .await?
            .ok_or_else(|| AppError::not_found(format!("Patient {patient_id}")))?;
        raw.into_record(true)
    }

    #[instrument(skip(self, patient))]
    async fn create_patient(&self, patient: &NewPatient) -> AppResult<u64> {
        // Feegow sex ids: 1 male, 2 female
        let sex_id = patient
            .sex
            .as_deref()
            .map(|s| if s.eq_ignore_ascii_case("M") { 1 } else { 2 });
        let body = CreateRequest {
            nome_completo: &patient.name,
            cpf: patient.cpf.as_deref(),
            data_nascimento: patient.birth_date.as_deref(),
            sexo_id: sex_id,
            celular: patient.phone.as_deref(),
            email: patient.email.as_deref(),
        };

        let response = self.post_json("patient/create", &body).await?;
        let envelope: Envelope<CreatedPatient> = response.json().await.map_err(|e| {
            AppError::external_service(FEEGOW, format!("JSON parse error: {e}"))
        })?;
        envelope
            .content
            .and_then(|c| parse_id(Some(&c.paciente_id)))
            .ok_or_else(|| AppError::external_service(FEEGOW, "create returned no patient id"))
    }

    #[instrument(skip(self, document), fields(filename = %document.filename))]
    async fn upload_document(&self, patient_id: u64, document: &DocumentUpload) -> AppResult<()> {
        let body = UploadRequest {
            paciente_id: patient_id,
            arquivo: STANDARD.encode(document.content.as_bytes()),
            nome_arquivo: &document.filename,
            descricao: &document.description,
            tipo: "text/markdown",
        };
        self.post_json("patient/upload-file", &body).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_documents(&self, patient_id: u64) -> AppResult<Vec<Value>> {
        Ok(self
            .get_content("patient/files", &[("paciente_id", patient_id.to_string())])
            .await?
            .unwrap_or_default())
    }
}

/// In-memory patient records for testing (no API calls)
pub struct MockPatientRecords {
    configured: bool,
    patients: RwLock<BTreeMap<u64, PatientRecord>>,
    documents: RwLock<BTreeMap<u64, Vec<Value>>>,
}

impl MockPatientRecords {
    /// Create a mock with two sample patients
    #[must_use]
    pub fn new() -> Self {
        let samples = [
            PatientRecord {
                id: 101,
                chart_number: Some("P-0101".to_owned()),
                name: Some("Maria Aparecida Silva".to_owned()),
                cpf: Some("123.456.789-00".to_owned()),
                birth_date: Some("1980-05-12".to_owned()),
                sex: "F".to_owned(),
                weight_kg: Some(80.0),
                height_cm: Some(165.0),
                ..PatientRecord::default()
            },
            PatientRecord {
                id: 102,
                chart_number: Some("P-0102".to_owned()),
                name: Some("João Pereira Santos".to_owned()),
                birth_date: Some("1962-11-03".to_owned()),
                sex: "M".to_owned(),
                weight_kg: Some(95.5),
                height_cm: Some(178.0),
                ..PatientRecord::default()
            },
        ];

        Self {
            configured: true,
            patients: RwLock::new(samples.into_iter().map(|p| (p.id, p)).collect()),
            documents: RwLock::new(BTreeMap::new()),
        }
    }

    /// Mock that behaves like a client without a token
    #[must_use]
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    fn ensure_configured(&self) -> AppResult<()> {
        if self.configured {
            Ok(())
        } else {
            Err(AppError::external_unavailable(FEEGOW, "FEEGOW não configurado"))
        }
    }

    /// Documents uploaded for a patient
    pub async fn uploaded(&self, patient_id: u64) -> Vec<Value> {
        self.documents
            .read()
            .await
            .get(&patient_id)
            .cloned()
            .unwrap_or_default()
    }
}

impl Default for MockPatientRecords {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PatientRecords for MockPatientRecords {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn search_patients(&self, query: &PatientQuery) -> AppResult<Vec<PatientRecord>> {
        self.ensure_configured()?;
        let name = query.name.as_deref().map(str::to_lowercase);
        let limit = query.limit.unwrap_or(DEFAULT_SEARCH_LIMIT) as usize;

        let patients = self.patients.read().await;
        Ok(patients
            .values()
            .filter(|p| match (&name, &p.name) {
                (None, _) => true,
                (Some(wanted), Some(full)) => full.to_lowercase().contains(wanted),
                (Some(_), None) => false,
            })
            .filter(|p| query.cpf.is_none() || p.cpf == query.cpf)
            .filter(|p| query.chart_number.is_none() || p.chart_number == query.chart_number)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn get_patient(&self, patient_id: u64) -> AppResult<PatientRecord> {
        self.ensure_configured()?;
        self.patients
            .read()
            .await
            .get(&patient_id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Patient {patient_id}")))
    }

    async fn create_patient(&self, patient: &NewPatient) -> AppResult<u64> {
        self.ensure_configured()?;
        let mut patients = self.patients.write().await;
        let id = patients.keys().next_back().map_or(1, |last| last + 1);
        patients.insert(
            id,
            PatientRecord {
                id,
                name: Some(patient.name.clone()),
                cpf: patient.cpf.clone(),
                birth_date: patient.birth_date.clone(),
                sex: patient.sex.clone().unwrap_or_else(|| "F".to_owned()),
                phone: patient.phone.clone(),
                email: patient.email.clone(),
                ..PatientRecord::default()
            },
        );
        drop(patients);
        Ok(id)
    }

    async fn upload_document(&self, patient_id: u64, document: &DocumentUpload) -> AppResult<()> {
        self.get_patient(patient_id).await?;
        self.documents
            .write()
            .await
            .entry(patient_id)
            .or_default()
            .push(serde_json::json!({
                "nome_arquivo": document.filename,
                "descricao": document.description,
                "tamanho": document.content.len(),
            }));
        Ok(())
    }

    async fn list_documents(&self, patient_id: u64) -> AppResult<Vec<Value>> {
        self.get_patient(patient_id).await?;
        Ok(self.uploaded(patient_id).await)
    }
}
