// ABOUTME: Patient chart commands for nutriplan-cli
// ABOUTME: Search, show and list chart files through the Feegow records client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use nutriplan_server::{
    config::ServerConfig,
    errors::AppResult,
    external::{FeegowClient, PatientQuery, PatientRecords},
};

use crate::helpers::display::{display_files, display_patient, display_patient_list};

/// Search patients
pub async fn search(
    config: &ServerConfig,
    name: Option<String>,
    cpf: Option<String>,
    chart_number: Option<String>,
    limit: Option<u32>,
) -> AppResult<()> {
    let client = FeegowClient::new(&config.feegow)?;
    let query = PatientQuery {
        name,
        cpf,
        chart_number,
        limit,
    };
    let patients = client.search_patients(&query).await?;
    display_patient_list(&patients);
    Ok(())
}

/// Show one patient
pub async fn get(config: &ServerConfig, patient_id: u64) -> AppResult<()> {
    let client = FeegowClient::new(&config.feegow)?;
    display_patient(&client.get_patient(patient_id).await?);
    Ok(())
}

/// List chart files
pub async fn files(config: &ServerConfig, patient_id: u64) -> AppResult<()> {
    let client = FeegowClient::new(&config.feegow)?;
    display_files(patient_id, &client.list_documents(patient_id).await?);
    Ok(())
}
