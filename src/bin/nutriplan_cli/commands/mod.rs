// ABOUTME: Command modules for nutriplan-cli plus the shared patient flags
// ABOUTME: Converts command-line patient data into a validated profile
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod analysis;
pub mod generate;
pub mod patients;
pub mod stats;

use clap::Args;
use nutriplan_server::errors::{AppError, AppResult};
use nutriplan_server::models::{DeficitLevel, DietType, PatientProfile, Sex};

/// Patient data given as flags
#[derive(Debug, Clone, Args)]
pub struct PatientArgs {
    /// Full name
    #[arg(long, default_value = "Paciente")]
    pub name: String,

    /// M or F
    #[arg(long)]
    pub sex: String,

    /// Age in years
    #[arg(long)]
    pub age: u32,

    /// Weight in kg
    #[arg(long)]
    pub weight: f64,

    /// Height in cm
    #[arg(long)]
    pub height: f64,

    /// HbA1c in percent
    #[arg(long)]
    pub hba1c: Option<f64>,

    /// Fasting glucose in mg/dL
    #[arg(long)]
    pub glucose: Option<f64>,

    /// Waist circumference in cm
    #[arg(long)]
    pub waist: Option<f64>,

    /// Diet type: personalizado, low_carb, low_carb_moderado, mediterraneo, high_protein
    #[arg(long, default_value = "personalizado")]
    pub diet_type: String,

    /// Deficit level: leve, moderado, intenso, muito_intenso
    #[arg(long, default_value = "moderado")]
    pub deficit: String,
}

impl PatientArgs {
    /// Build and validate the profile
    pub fn into_profile(self) -> AppResult<PatientProfile> {
        let sex = Sex::parse(&self.sex)
            .ok_or_else(|| AppError::invalid_input(format!("invalid sex: {}. Use M or F", self.sex)))?;
        let profile = PatientProfile {
            name: self.name,
            sex,
            age: self.age,
            weight_kg: self.weight,
            height_cm: self.height,
            hba1c: self.hba1c,
            fasting_glucose: self.glucose,
            waist_cm: self.waist,
            diet_type: DietType::from_str_or_default(&self.diet_type),
            deficit_level: DeficitLevel::from_str_or_default(&self.deficit),
        };
        profile.validate()?;
        Ok(profile)
    }
}
