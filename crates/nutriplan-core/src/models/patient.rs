// ABOUTME: Patient input model with sex, diet type, deficit and activity enums
// ABOUTME: Validates anthropometric and glycemic ranges at the service boundary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::limits;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Biological sex used by the metabolic formulas
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Sex {
    /// Male (`"M"`)
    #[serde(rename = "M", alias = "m")]
    Male,
    /// Female (`"F"`)
    #[serde(rename = "F", alias = "f")]
    Female,
}

impl Sex {
    /// Parse from the one-letter form code or an English word
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "M" | "MALE" | "MASCULINO" => Some(Self::Male),
            "F" | "FEMALE" | "FEMININO" => Some(Self::Female),
            _ => None,
        }
    }

    /// Formal pt-BR form of address
    #[must_use]
    pub const fn honorific(self) -> &'static str {
        match self {
            Self::Male => "Sr.",
            Self::Female => "Sra.",
        }
    }

    /// pt-BR label used in rendered documents
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "Masculino",
            Self::Female => "Feminino",
        }
    }
}

/// Macro distribution profile chosen for the patient
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, Default)]
pub enum DietType {
    /// Balanced 50/20/30 split
    #[default]
    #[serde(rename = "personalizado")]
    Balanced,
    /// Strongly reduced carbohydrate
    #[serde(rename = "low_carb")]
    LowCarb,
    /// Moderately reduced carbohydrate
    #[serde(rename = "low_carb_moderado")]
    LowCarbModerate,
    /// Mediterranean style, more unsaturated fat
    #[serde(rename = "mediterraneo")]
    Mediterranean,
    /// High protein
    #[serde(rename = "high_protein")]
    HighProtein,
}

impl DietType {
    /// All diet types, in table order
    pub const ALL: [Self; 5] = [
        Self::Balanced,
        Self::LowCarb,
        Self::LowCarbModerate,
        Self::Mediterranean,
        Self::HighProtein,
    ];

    /// Parse from string; unknown values fall back to `Balanced`
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "low_carb" | "lowcarb" => Self::LowCarb,
            "low_carb_moderado" | "low_carb_moderate" => Self::LowCarbModerate,
            "mediterraneo" | "mediterranean" => Self::Mediterranean,
            "high_protein" => Self::HighProtein,
            _ => Self::Balanced,
        }
    }

    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Balanced => "personalizado",
            Self::LowCarb => "low_carb",
            Self::LowCarbModerate => "low_carb_moderado",
            Self::Mediterranean => "mediterraneo",
            Self::HighProtein => "high_protein",
        }
    }
}

impl fmt::Display for DietType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DietType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(|s| Self::from_str_or_default(&s))
    }
}

/// Caloric deficit applied to the total energy need
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, Default)]
pub enum DeficitLevel {
    /// ~15% deficit
    #[serde(rename = "leve")]
    Mild,
    /// ~20% deficit
    #[default]
    #[serde(rename = "moderado")]
    Moderate,
    /// ~30% deficit
    #[serde(rename = "intenso")]
    Intense,
    /// ~40% deficit
    #[serde(rename = "muito_intenso")]
    VeryIntense,
}

impl DeficitLevel {
    /// All deficit levels, mildest first
    pub const ALL: [Self; 4] = [Self::Mild, Self::Moderate, Self::Intense, Self::VeryIntense];

    /// Parse from string; unknown values fall back to `Moderate`
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "leve" | "mild" => Self::Mild,
            "intenso" | "intense" => Self::Intense,
            "muito_intenso" | "very_intense" => Self::VeryIntense,
            _ => Self::Moderate,
        }
    }

    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mild => "leve",
            Self::Moderate => "moderado",
            Self::Intense => "intenso",
            Self::VeryIntense => "muito_intenso",
        }
    }

    /// Short pt-BR description shown in the calculation preview
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Mild => "Déficit leve (~15%), perda de peso gradual",
            Self::Moderate => "Déficit moderado (~20%), cerca de 500 kcal/dia",
            Self::Intense => "Déficit intenso (~30%), exige acompanhamento próximo",
            Self::VeryIntense => "Déficit muito intenso (~40%), apenas sob supervisão médica",
        }
    }
}

impl fmt::Display for DeficitLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DeficitLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(|s| Self::from_str_or_default(&s))
    }
}

/// Physical activity level for the energy-need multiplier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    #[default]
    Light,
    /// Moderate exercise 3-5 days/week
    Moderate,
    /// Hard exercise 6-7 days/week
    Intense,
    /// Very hard exercise or physical job
    VeryIntense,
}

impl ActivityLevel {
    /// Parse from string; unknown values fall back to `Light`
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "sedentary" | "sedentario" => Self::Sedentary,
            "moderate" | "moderado" => Self::Moderate,
            "intense" | "intenso" => Self::Intense,
            "very_intense" | "muito_intenso" => Self::VeryIntense,
            _ => Self::Light,
        }
    }
}

/// Patient data collected by the intake form
///
/// Immutable once validated; created per request and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientProfile {
    /// Full name
    #[serde(rename = "nome", alias = "name")]
    pub name: String,
    /// Biological sex
    #[serde(rename = "sexo", alias = "sex")]
    pub sex: Sex,
    /// Age in years
    #[serde(rename = "idade", alias = "age")]
    pub age: u32,
    /// Weight in kg
    #[serde(rename = "peso", alias = "weight_kg")]
    pub weight_kg: f64,
    /// Height in cm
    #[serde(rename = "altura", alias = "height_cm")]
    pub height_cm: f64,
    /// Glycated hemoglobin in percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hba1c: Option<f64>,
    /// Fasting glucose in mg/dL
    #[serde(
        rename = "glicemia",
        alias = "fasting_glucose",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub fasting_glucose: Option<f64>,
    /// Waist circumference in cm
    #[serde(
        rename = "cintura",
        alias = "waist_cm",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub waist_cm: Option<f64>,
    /// Macro distribution profile
    #[serde(rename = "tipo_dieta", alias = "diet_type", default)]
    pub diet_type: DietType,
    /// Caloric deficit level
    #[serde(rename = "nivel_deficit", alias = "deficit_level", default)]
    pub deficit_level: DeficitLevel,
}

impl PatientProfile {
    /// Check every field against its accepted range
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a too-short name and `ValueOutOfRange`
    /// for any numeric field outside its bounds.
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().chars().count() < limits::MIN_NAME_LEN {
            return Err(AppError::invalid_input(format!(
                "name must have at least {} characters",
                limits::MIN_NAME_LEN
            )));
        }

        let (min_age, max_age) = limits::AGE_RANGE;
        if !(min_age..=max_age).contains(&self.age) {
            return Err(AppError::value_out_of_range(
                "age",
                f64::from(min_age),
                f64::from(max_age),
                f64::from(self.age),
            ));
        }

        check_range("weight_kg", self.weight_kg, limits::WEIGHT_KG_RANGE)?;
        check_range("height_cm", self.height_cm, limits::HEIGHT_CM_RANGE)?;

        if let Some(hba1c) = self.hba1c {
            check_range("hba1c", hba1c, limits::HBA1C_RANGE)?;
        }
        if let Some(glucose) = self.fasting_glucose {
            check_range("fasting_glucose", glucose, limits::GLUCOSE_RANGE)?;
        }
        if let Some(waist) = self.waist_cm {
            check_range("waist_cm", waist, limits::WAIST_CM_RANGE)?;
        }

        Ok(())
    }

    /// First name, used for the formal salutation
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

fn check_range(field: &str, value: f64, (min, max): (f64, f64)) -> AppResult<()> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(AppError::value_out_of_range(field, min, max, value))
    }
}
