// ABOUTME: External patient-records integration (Feegow electronic medical records)
// ABOUTME: Defines the PatientRecords contract with an HTTP client and an in-memory mock
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! External API Clients
//!
//! Generated plans can be attached to a patient's chart in the clinic's records
//! system. Routes and the CLI only see [`PatientRecords`].

pub mod feegow_client;

pub use feegow_client::{FeegowClient, MockPatientRecords};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppResult;

/// Default page size for patient searches
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;

/// Patient search filters; empty filters are not sent
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatientQuery {
    /// Partial name
    #[serde(default, rename = "nome")]
    pub name: Option<String>,
    /// CPF (Brazilian taxpayer id)
    #[serde(default)]
    pub cpf: Option<String>,
    /// Chart number
    #[serde(default, rename = "prontuario")]
    pub chart_number: Option<String>,
    /// Maximum results
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Postal address of a patient
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatientAddress {
    /// Street
    #[serde(rename = "logradouro")]
    pub street: Option<String>,
    /// Number
    #[serde(rename = "numero")]
    pub number: Option<String>,
    /// District
    #[serde(rename = "bairro")]
    pub district: Option<String>,
    /// City
    #[serde(rename = "cidade")]
    pub city: Option<String>,
    /// State
    #[serde(rename = "estado")]
    pub state: Option<String>,
    /// Postal code
    #[serde(rename = "cep")]
    pub postal_code: Option<String>,
}

/// A patient as exposed by the records system
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PatientRecord {
    /// Records-system id
    pub id: u64,
    /// Chart number
    #[serde(rename = "prontuario")]
    pub chart_number: Option<String>,
    /// Full name
    #[serde(rename = "nome")]
    pub name: Option<String>,
    /// CPF
    pub cpf: Option<String>,
    /// Birth date, `YYYY-MM-DD`
    #[serde(rename = "data_nascimento")]
    pub birth_date: Option<String>,
    /// Age in whole years, derived from the birth date
    #[serde(rename = "idade", skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    /// `M` or `F`
    #[serde(rename = "sexo")]
    pub sex: String,
    /// Mobile or landline
    #[serde(rename = "telefone")]
    pub phone: Option<String>,
    /// E-mail
    pub email: Option<String>,
    /// Weight, kg
    #[serde(rename = "peso")]
    pub weight_kg: Option<f64>,
    /// Height, cm
    #[serde(rename = "altura")]
    pub height_cm: Option<f64>,
    /// Address, only on single-patient lookups
    #[serde(rename = "endereco", skip_serializing_if = "Option::is_none")]
    pub address: Option<PatientAddress>,
}

/// Data for registering a new patient
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewPatient {
    /// Full name
    #[serde(rename = "nome")]
    pub name: String,
    /// CPF
    #[serde(default)]
    pub cpf: Option<String>,
    /// Birth date, `YYYY-MM-DD`
    #[serde(default, rename = "data_nascimento")]
    pub birth_date: Option<String>,
    /// `M` or `F`
    #[serde(default, rename = "sexo")]
    pub sex: Option<String>,
    /// Phone
    #[serde(default, rename = "telefone")]
    pub phone: Option<String>,
    /// E-mail
    #[serde(default)]
    pub email: Option<String>,
}

/// Description used when none is given for an uploaded plan
pub const DEFAULT_DOCUMENT_DESCRIPTION: &str = "Plano Alimentar Personalizado";

/// A markdown document to attach to a chart
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentUpload {
    /// File name shown in the chart
    #[serde(rename = "nome_arquivo")]
    pub filename: String,
    /// Markdown body
    #[serde(rename = "conteudo")]
    pub content: String,
    /// Description shown in the chart
    #[serde(rename = "descricao", default = "default_description")]
    pub description: String,
}

fn default_description() -> String {
    DEFAULT_DOCUMENT_DESCRIPTION.to_owned()
}

impl DocumentUpload {
    /// Upload with the default description
    #[must_use]
    pub fn markdown(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
            description: default_description(),
        }
    }
}

/// Patient chart storage
#[async_trait]
pub trait PatientRecords: Send + Sync {
    /// Whether credentials are present
    fn is_configured(&self) -> bool;

    /// Search patients by name, CPF or chart number
    async fn search_patients(&self, query: &PatientQuery) -> AppResult<Vec<PatientRecord>>;

    /// Full record of one patient
    async fn get_patient(&self, patient_id: u64) -> AppResult<PatientRecord>;

    /// Register a patient and return the new id
    async fn create_patient(&self, patient: &NewPatient) -> AppResult<u64>;

    /// Attach a document to the patient's chart
    async fn upload_document(&self, patient_id: u64, document: &DocumentUpload) -> AppResult<()>;

    /// Files in the patient's chart, as returned by the records system
    async fn list_documents(&self, patient_id: u64) -> AppResult<Vec<Value>>;
}
