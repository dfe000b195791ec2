// ABOUTME: Calculation preview and complexity analysis route handlers
// ABOUTME: Lets the form show metrics and the routing decision before generating a plan
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::constants::endpoints::{ANALYZE_COMPLEXITY, CALCULATION_PREVIEW};
use crate::errors::{AppError, AppResult};
use crate::intelligence::nutrition_calculator::{
    basal_metabolic_rate, bmi_classification, body_mass_index, cardiovascular_risk,
    ideal_weight_range, suggest_objective, target_calories, total_energy_need,
    water_intake_liters,
};
use crate::intelligence::NutritionConfig;
use crate::models::{
    ActivityLevel, DeficitLevel, DietType, IdealWeightRange, PatientProfile, Sex,
};
use crate::server::AppState;

/// Query string of `GET /api/calcular-preview`
#[derive(Debug, Clone, Deserialize)]
pub struct PreviewQuery {
    /// Weight, kg
    pub peso: f64,
    /// Height, cm
    pub altura: f64,
    /// Age, years
    pub idade: u32,
    /// `M` or `F`
    pub sexo: String,
    /// Deficit level; absent means `moderado`
    #[serde(default)]
    pub nivel_deficit: Option<String>,
    /// Waist circumference, cm
    #[serde(default)]
    pub cintura: Option<f64>,
}

/// Waist-based risk block of the preview
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreviewCardiovascular {
    /// Waist / height, two decimals
    pub relacao_cintura_altura: f64,
    /// pt-BR risk label
    pub risco: String,
}

/// Metrics shown before generation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalculationPreview {
    /// BMR, kcal
    pub tmb: f64,
    /// BMI, one decimal
    pub imc: f64,
    /// pt-BR BMI class
    pub classificacao_imc: String,
    /// Total energy need at light activity, kcal
    pub necessidade_calorica: f64,
    /// Target after the deficit, kcal
    pub meta_calorica: f64,
    /// Deficit wire name
    pub nivel_deficit: DeficitLevel,
    /// pt-BR deficit description
    pub deficit_descricao: String,
    /// Healthy weight band
    pub peso_ideal: IdealWeightRange,
    /// Daily water, litres
    pub agua_litros: f64,
    /// Present only when a waist was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risco_cardiovascular: Option<PreviewCardiovascular>,
    /// Objective suggested by BMI alone
    pub suggested_objective: String,
}

impl PreviewQuery {
    fn into_profile(self) -> AppResult<PatientProfile> {
        let sex = Sex::parse(&self.sexo).ok_or_else(|| {
            AppError::invalid_input(format!("invalid sex: {}. Use M or F", self.sexo))
        })?;
        let profile = PatientProfile {
            name: "preview".to_owned(),
            sex,
            age: self.idade,
            weight_kg: self.peso,
            height_cm: self.altura,
            hba1c: None,
            fasting_glucose: None,
            waist_cm: self.cintura.filter(|w| *w > 0.0),
            diet_type: DietType::default(),
            deficit_level: self
                .nivel_deficit
                .as_deref()
                .map_or(DeficitLevel::Moderate, DeficitLevel::from_str_or_default),
        };
        profile.validate()?;
        Ok(profile)
    }
}

/// Compute the preview for a validated profile
#[must_use]
pub fn calculation_preview(patient: &PatientProfile, config: &NutritionConfig) -> CalculationPreview {
    let bmr = basal_metabolic_rate(
        patient.weight_kg,
        patient.height_cm,
        patient.age,
        patient.sex,
        config,
    );
    let need = total_energy_need(bmr, ActivityLevel::Light, config);
    let target = target_calories(need, patient.deficit_level, patient.sex, config);
    let bmi = body_mass_index(patient.weight_kg, patient.height_cm);
    let risk = patient.waist_cm.map(|waist| {
        let assessment = cardiovascular_risk(waist, patient.height_cm, patient.sex, config);
        PreviewCardiovascular {
            relacao_cintura_altura: (assessment.waist_to_height_ratio * 100.0).round() / 100.0,
            risco: assessment.risk.label().to_owned(),
        }
    });

    CalculationPreview {
        tmb: bmr.round(),
        imc: (bmi * 10.0).round() / 10.0,
        classificacao_imc: bmi_classification(bmi).label().to_owned(),
        necessidade_calorica: need.round(),
        meta_calorica: target.round(),
        nivel_deficit: patient.deficit_level,
        deficit_descricao: patient.deficit_level.description().to_owned(),
        peso_ideal: ideal_weight_range(patient.height_cm, patient.sex, config),
        agua_litros: (water_intake_liters(patient.weight_kg, config) * 10.0).round() / 10.0,
        risco_cardiovascular: risk,
        suggested_objective: suggest_objective(bmi).label().to_owned(),
    }
}

/// Preview and complexity routes
pub struct AnalysisRoutes;

impl AnalysisRoutes {
    /// Create the analysis routes
    pub fn routes(state: Arc<AppState>) -> Router {
        Router::new()
            .route(CALCULATION_PREVIEW, get(Self::handle_preview))
            .route(ANALYZE_COMPLEXITY, post(Self::handle_analyze))
            .with_state(state)
    }

    async fn handle_preview(
        State(state): State<Arc<AppState>>,
        Query(query): Query<PreviewQuery>,
    ) -> AppResult<Response> {
        let profile = query.into_profile()?;
        let preview = calculation_preview(&profile, state.orchestrator.nutrition_config());
        Ok((StatusCode::OK, Json(preview)).into_response())
    }

    async fn handle_analyze(
        State(state): State<Arc<AppState>>,
        Json(patient): Json<PatientProfile>,
    ) -> AppResult<Response> {
        patient.validate()?;
        let analysis = state.orchestrator.analyze_complexity(&patient);
        let response = json!({
            "score": analysis.score,
            "factors": analysis.factor_descriptions(),
            "recommendation": analysis.recommendation,
            "rationale": analysis.rationale,
            "patient_summary": analysis.patient_summary,
            "estimated_cost": state.orchestrator.prices(),
        });
        Ok((StatusCode::OK, Json(response)).into_response())
    }
}
