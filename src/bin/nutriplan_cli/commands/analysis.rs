// ABOUTME: Preview and complexity commands for nutriplan-cli
// ABOUTME: Shows calculated metrics and the routing decision without generating a plan
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use nutriplan_server::{
    config::ServerConfig,
    errors::AppResult,
    intelligence::{ComplexityAnalyzer, NutritionConfig},
    routes::calculation_preview,
};

use super::PatientArgs;
use crate::helpers::display::{display_complexity, display_preview};

/// Print the calculation preview
pub fn preview(patient: PatientArgs) -> AppResult<()> {
    let patient = patient.into_profile()?;
    let preview = calculation_preview(&patient, &NutritionConfig::default());
    display_preview(&preview);
    Ok(())
}

/// Print the complexity score and estimated costs
pub fn analyze(config: &ServerConfig, patient: PatientArgs) -> AppResult<()> {
    let patient = patient.into_profile()?;
    let analysis = ComplexityAnalyzer::new(config.generation.complexity).analyze(&patient);
    display_complexity(&analysis, &config.generation.prices);
    Ok(())
}
