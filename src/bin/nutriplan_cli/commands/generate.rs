// ABOUTME: Plan generation command for nutriplan-cli
// ABOUTME: Runs the hybrid router or the carb-counting renderer, then saves, prints or uploads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use nutriplan_server::{
    config::ServerConfig,
    errors::{AppError, AppResult},
    external::{DocumentUpload, FeegowClient, PatientRecords},
    formatters::CarbCountingFormatter,
    generation::HybridOrchestrator,
    intelligence::{FoodPicker, SeededPicker, UniformPicker},
    models::{GenerationStrategy, PatientProfile},
    routes::diet_filename,
    server::build_orchestrator,
    usage::UsageTracker,
};
use tokio::fs;
use tracing::info;

use super::PatientArgs;
use crate::helpers::display::{display_generation_summary, display_upload_success};

/// Flags of `generate` other than the patient data
pub struct GenerateOptions {
    /// Requested mode wire name
    pub mode: Option<String>,
    /// Seed for reproducible picks
    pub seed: Option<u64>,
    /// Output file
    pub output: Option<PathBuf>,
    /// Render the carb-counting document
    pub carb_counting: bool,
    /// Insulin units per 15 g of carbohydrate
    pub insulin_ratio: Option<f64>,
    /// Chart to attach the document to
    pub upload_to: Option<u64>,
}

/// Generate a plan document
pub async fn run(
    config: &ServerConfig,
    patient: PatientArgs,
    options: GenerateOptions,
) -> AppResult<()> {
    let patient = patient.into_profile()?;
    let requested = options
        .mode
        .as_deref()
        .map(str::parse::<GenerationStrategy>)
        .transpose()?;

    let usage = Arc::new(UsageTracker::open(&config.usage).await);
    let mut orchestrator = build_orchestrator(config, usage)?;
    if let Some(seed) = options.seed {
        orchestrator = orchestrator
            .with_picker_factory(Arc::new(move || Box::new(SeededPicker::new(seed))));
    }

    let document = if options.carb_counting {
        render_carb_counting(&orchestrator, &patient, options.seed, options.insulin_ratio)?
    } else {
        let outcome = orchestrator.generate(&patient, requested).await?;
        display_generation_summary(&outcome.metadata);
        outcome.document
    };

    let filename = diet_filename(&patient.name, Local::now().date_naive());
    match &options.output {
        Some(path) => {
            fs::write(path, &document)
                .await
                .map_err(|e| AppError::storage(format!("cannot write {}: {e}", path.display())))?;
            info!(path = %path.display(), "plan written");
            println!("Plan saved to {}", path.display());
        }
        None => println!("{document}"),
    }

    if let Some(patient_id) = options.upload_to {
        let records = FeegowClient::new(&config.feegow)?;
        let upload_name = options
            .output
            .as_ref()
            .and_then(|p| p.file_name())
            .map_or(filename, |name| name.to_string_lossy().into_owned());
        records
            .upload_document(patient_id, &DocumentUpload::markdown(&upload_name, document))
            .await?;
        display_upload_success(patient_id, &upload_name);
    }

    Ok(())
}

fn render_carb_counting(
    orchestrator: &HybridOrchestrator,
    patient: &PatientProfile,
    seed: Option<u64>,
    insulin_ratio: Option<f64>,
) -> AppResult<String> {
    let mut picker: Box<dyn FoodPicker> = match seed {
        Some(seed) => Box::new(SeededPicker::new(seed)),
        None => Box::new(UniformPicker),
    };
    let plan = orchestrator.build_plan(patient, picker.as_mut())?;
    Ok(CarbCountingFormatter::default().format_carb_counting_diet(&plan, insulin_ratio))
}
