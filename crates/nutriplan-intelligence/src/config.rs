// ABOUTME: Immutable constant tables injected into the calculator, assembler and analyzer
// ABOUTME: Metabolic coefficients, macro and meal splits, diet adjustments, complexity thresholds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Intelligence Configuration
//!
//! Every number the pipeline depends on lives in one of these structs.
//! `Default` reproduces the clinical tables; tests and deployments may
//! inject alternatives.
//!
//! # References
//!
//! - BMR: Mifflin et al. (1990) DOI: 10.1093/ajcn/51.2.241
//! - Ideal weight: Lorentz formula, WHO BMI bands 18.5-24.9

use nutriplan_core::constants::{energy, limits};
use nutriplan_core::errors::{AppError, ErrorCode};
use nutriplan_core::models::{ActivityLevel, DeficitLevel, DietType, MealSlot, Sex};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Thresholds or multipliers in the wrong order
    #[error("Invalid range: {0}")]
    InvalidRange(&'static str),

    /// Weights don't sum to required total (e.g., not 100%)
    #[error("Invalid weights: {0}")]
    InvalidWeights(&'static str),

    /// Numeric value outside valid range for parameter
    #[error("Value out of range: {0}")]
    ValueOutOfRange(&'static str),
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        Self::new(ErrorCode::ConfigInvalid, error.to_string())
    }
}

/// Mifflin-St Jeor coefficients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BmrConfig {
    /// Weight coefficient (10.0)
    pub weight_coef: f64,
    /// Height coefficient (6.25)
    pub height_coef: f64,
    /// Age coefficient (-5.0)
    pub age_coef: f64,
    /// Male constant (+5)
    pub male_constant: f64,
    /// Female constant (-161)
    pub female_constant: f64,
}

impl Default for BmrConfig {
    fn default() -> Self {
        Self {
            weight_coef: 10.0,
            height_coef: 6.25,
            age_coef: -5.0,
            male_constant: 5.0,
            female_constant: -161.0,
        }
    }
}

/// Activity factor multipliers for total energy need
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityFactorsConfig {
    /// Sedentary: 1.2
    pub sedentary: f64,
    /// Light: 1.375
    pub light: f64,
    /// Moderate: 1.55
    pub moderate: f64,
    /// Intense: 1.725
    pub intense: f64,
    /// Very intense: 1.9
    pub very_intense: f64,
}

impl Default for ActivityFactorsConfig {
    fn default() -> Self {
        Self {
            sedentary: 1.2,
            light: 1.375,
            moderate: 1.55,
            intense: 1.725,
            very_intense: 1.9,
        }
    }
}

impl ActivityFactorsConfig {
    /// Factor for a level
    #[must_use]
    pub const fn factor(&self, level: ActivityLevel) -> f64 {
        match level {
            ActivityLevel::Sedentary => self.sedentary,
            ActivityLevel::Light => self.light,
            ActivityLevel::Moderate => self.moderate,
            ActivityLevel::Intense => self.intense,
            ActivityLevel::VeryIntense => self.very_intense,
        }
    }
}

/// Calorie multipliers per deficit level, plus the safety floor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeficitConfig {
    /// Mild: 0.85
    pub mild: f64,
    /// Moderate: 0.80
    pub moderate: f64,
    /// Intense: 0.70
    pub intense: f64,
    /// Very intense: 0.60
    pub very_intense: f64,
    /// Minimum daily target in kcal, regardless of sex
    pub min_calories: f64,
}

impl Default for DeficitConfig {
    fn default() -> Self {
        Self {
            mild: 0.85,
            moderate: 0.80,
            intense: 0.70,
            very_intense: 0.60,
            min_calories: 1200.0,
        }
    }
}

impl DeficitConfig {
    /// Multiplier for a level
    #[must_use]
    pub const fn multiplier(&self, level: DeficitLevel) -> f64 {
        match level {
            DeficitLevel::Mild => self.mild,
            DeficitLevel::Moderate => self.moderate,
            DeficitLevel::Intense => self.intense,
            DeficitLevel::VeryIntense => self.very_intense,
        }
    }
}

/// Percent of calories from each macronutrient
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MacroPercentages {
    /// Carbohydrate percent
    pub carb: f64,
    /// Protein percent
    pub protein: f64,
    /// Fat percent
    pub fat: f64,
}

impl MacroPercentages {
    const fn new(carb: f64, protein: f64, fat: f64) -> Self {
        Self { carb, protein, fat }
    }
}

/// Macro percentages per diet type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacroTableConfig {
    /// 50/20/30
    pub balanced: MacroPercentages,
    /// 25/30/45
    pub low_carb: MacroPercentages,
    /// 35/25/40
    pub low_carb_moderate: MacroPercentages,
    /// 45/25/30
    pub mediterranean: MacroPercentages,
    /// 40/35/25
    pub high_protein: MacroPercentages,
}

impl Default for MacroTableConfig {
    fn default() -> Self {
        Self {
            balanced: MacroPercentages::new(50.0, 20.0, 30.0),
            low_carb: MacroPercentages::new(25.0, 30.0, 45.0),
            low_carb_moderate: MacroPercentages::new(35.0, 25.0, 40.0),
            mediterranean: MacroPercentages::new(45.0, 25.0, 30.0),
            high_protein: MacroPercentages::new(40.0, 35.0, 25.0),
        }
    }
}

impl MacroTableConfig {
    /// Percentages for a diet type
    #[must_use]
    pub const fn for_diet(&self, diet: DietType) -> MacroPercentages {
        match diet {
            DietType::Balanced => self.balanced,
            DietType::LowCarb => self.low_carb,
            DietType::LowCarbModerate => self.low_carb_moderate,
            DietType::Mediterranean => self.mediterranean,
            DietType::HighProtein => self.high_protein,
        }
    }

    /// Validate that every row sums to 100%
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidWeights` when a row does not sum to 100.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for diet in DietType::ALL {
            let row = self.for_diet(diet);
            if ((row.carb + row.protein + row.fat) - 100.0).abs() > 1e-9 {
                return Err(ConfigError::InvalidWeights(
                    "macro percentages must sum to 100",
                ));
            }
        }
        Ok(())
    }
}

/// Share of daily calories for one slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealShare {
    /// Slot
    pub slot: MealSlot,
    /// Display name
    pub name: String,
    /// Suggested time
    pub time: String,
    /// Percent of daily calories
    pub percent: f64,
}

/// Per-slot calorie distribution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealDistributionConfig {
    /// Shares in slot order
    pub shares: Vec<MealShare>,
}

impl Default for MealDistributionConfig {
    fn default() -> Self {
        let share = |slot: MealSlot, percent| MealShare {
            slot,
            name: slot.display_name().to_owned(),
            time: slot.default_time().to_owned(),
            percent,
        };
        Self {
            shares: vec![
                share(MealSlot::Breakfast, 20.0),
                share(MealSlot::Lunch, 30.0),
                share(MealSlot::Snack, 15.0),
                share(MealSlot::Dinner, 25.0),
                share(MealSlot::Supper, 10.0),
            ],
        }
    }
}

impl MealDistributionConfig {
    /// Validate that shares cover every slot once and sum to 100%
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidWeights` on a bad sum or slot set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let total: f64 = self.shares.iter().map(|s| s.percent).sum();
        if (total - 100.0).abs() > 1e-9 {
            return Err(ConfigError::InvalidWeights(
                "meal shares must sum to 100",
            ));
        }
        let covers_all = MealSlot::ALL
            .iter()
            .all(|slot| self.shares.iter().filter(|s| s.slot == *slot).count() == 1);
        if !covers_all {
            return Err(ConfigError::InvalidWeights(
                "meal shares must list every slot exactly once",
            ));
        }
        Ok(())
    }
}

/// Waist-to-height cut-offs for one sex
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RiskCutoffs {
    /// Below this ratio: low risk
    pub moderate_from: f64,
    /// Below this ratio: moderate risk
    pub elevated_from: f64,
    /// At or above this ratio: very elevated risk
    pub very_elevated_from: f64,
}

/// Cardiovascular risk cut-offs by sex
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardiovascularConfig {
    /// Female cut-offs: 0.49 / 0.54 / 0.58
    pub female: RiskCutoffs,
    /// Male cut-offs: 0.53 / 0.58 / 0.63
    pub male: RiskCutoffs,
}

impl Default for CardiovascularConfig {
    fn default() -> Self {
        Self {
            female: RiskCutoffs {
                moderate_from: 0.49,
                elevated_from: 0.54,
                very_elevated_from: 0.58,
            },
            male: RiskCutoffs {
                moderate_from: 0.53,
                elevated_from: 0.58,
                very_elevated_from: 0.63,
            },
        }
    }
}

impl CardiovascularConfig {
    /// Cut-offs for a sex
    #[must_use]
    pub const fn for_sex(&self, sex: Sex) -> RiskCutoffs {
        match sex {
            Sex::Male => self.male,
            Sex::Female => self.female,
        }
    }
}

/// Healthy weight and hydration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyCompositionConfig {
    /// Lower healthy BMI (18.5)
    pub healthy_bmi_min: f64,
    /// Upper healthy BMI (24.9)
    pub healthy_bmi_max: f64,
    /// Lorentz divisor for men (4.0)
    pub lorentz_male_divisor: f64,
    /// Lorentz divisor for women (2.5)
    pub lorentz_female_divisor: f64,
    /// Water ml per kg (35)
    pub water_ml_per_kg: f64,
}

impl Default for BodyCompositionConfig {
    fn default() -> Self {
        Self {
            healthy_bmi_min: 18.5,
            healthy_bmi_max: 24.9,
            lorentz_male_divisor: 4.0,
            lorentz_female_divisor: 2.5,
            water_ml_per_kg: energy::WATER_ML_PER_KG,
        }
    }
}

/// Constant tables for the nutrition calculator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NutritionConfig {
    /// BMR coefficients
    pub bmr: BmrConfig,
    /// Activity factors
    pub activity_factors: ActivityFactorsConfig,
    /// Deficit multipliers and calorie floor
    pub deficit: DeficitConfig,
    /// Macro split per diet type
    pub macros: MacroTableConfig,
    /// Per-meal distribution
    pub meals: MealDistributionConfig,
    /// Cardiovascular cut-offs
    pub cardiovascular: CardiovascularConfig,
    /// Ideal weight and water
    pub body_composition: BodyCompositionConfig,
}

impl NutritionConfig {
    /// Validate all tables
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError` found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.macros.validate()?;
        self.meals.validate()?;
        if self.deficit.min_calories <= 0.0 {
            return Err(ConfigError::ValueOutOfRange(
                "minimum calories must be positive",
            ));
        }
        Ok(())
    }
}

/// Category a role's share is adjusted by
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentCategory {
    /// Cereals and breads
    Cereal,
    /// Protein foods, dairy included
    Protein,
    /// Oils, nuts, seeds
    Fat,
    /// Fruit
    Fruit,
    /// Beans and pulses
    Legume,
}

/// Per-category share multipliers for one diet type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DietAdjustment {
    /// Cereal multiplier
    pub cereal: f64,
    /// Protein multiplier
    pub protein: f64,
    /// Fat multiplier
    pub fat: f64,
    /// Fruit multiplier
    pub fruit: f64,
    /// Legume multiplier
    pub legume: f64,
}

impl DietAdjustment {
    const fn new(cereal: f64, protein: f64, fat: f64, fruit: f64, legume: f64) -> Self {
        Self {
            cereal,
            protein,
            fat,
            fruit,
            legume,
        }
    }

    /// Adjustment profile for a diet type
    #[must_use]
    pub const fn for_diet(diet: DietType) -> Self {
        match diet {
            DietType::Balanced => Self::new(1.0, 1.0, 1.0, 1.0, 1.0),
            DietType::LowCarb => Self::new(0.4, 1.5, 1.8, 0.6, 0.7),
            DietType::LowCarbModerate => Self::new(0.6, 1.3, 1.4, 0.8, 0.8),
            DietType::Mediterranean => Self::new(0.9, 1.1, 1.2, 1.0, 1.2),
            DietType::HighProtein => Self::new(0.7, 1.8, 0.8, 0.8, 1.3),
        }
    }

    /// Multiplier for a category; `None` is never adjusted
    #[must_use]
    pub const fn multiplier(&self, category: Option<AdjustmentCategory>) -> f64 {
        match category {
            Some(AdjustmentCategory::Cereal) => self.cereal,
            Some(AdjustmentCategory::Protein) => self.protein,
            Some(AdjustmentCategory::Fat) => self.fat,
            Some(AdjustmentCategory::Fruit) => self.fruit,
            Some(AdjustmentCategory::Legume) => self.legume,
            None => 1.0,
        }
    }
}

impl Default for DietAdjustment {
    fn default() -> Self {
        Self::for_diet(DietType::Balanced)
    }
}

/// Portion sizing rules for the meal assembler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblerConfig {
    /// Lower clamp as a multiple of the usual portion (0.3)
    pub min_portion_multiplier: f64,
    /// Upper clamp as a multiple of the usual portion (3.0)
    pub max_portion_multiplier: f64,
    /// Salad grams before the low-calorie bonus (50)
    pub greens_base_grams: f64,
    /// Slot calories at which the salad bonus reaches zero (1800)
    pub greens_reference_kcal: f64,
    /// kcal below the reference per extra gram of salad (20)
    pub greens_divisor: f64,
    /// Fixed grams of the salad garnish (60)
    pub garnish_grams: f64,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            min_portion_multiplier: 0.3,
            max_portion_multiplier: 3.0,
            greens_base_grams: 50.0,
            greens_reference_kcal: 1800.0,
            greens_divisor: 20.0,
            garnish_grams: 60.0,
        }
    }
}

impl AssemblerConfig {
    /// Validate the clamp and divisor
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidRange` when the clamp is inverted or non-positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_portion_multiplier <= 0.0
            || self.min_portion_multiplier > self.max_portion_multiplier
        {
            return Err(ConfigError::InvalidRange(
                "portion multipliers must satisfy 0 < min <= max",
            ));
        }
        if self.greens_divisor <= 0.0 {
            return Err(ConfigError::ValueOutOfRange(
                "greens divisor must be positive",
            ));
        }
        Ok(())
    }
}

/// Score thresholds for the strategy recommendation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComplexityConfig {
    /// Scores at or below this stay local (3)
    pub simple_threshold: u8,
    /// Scores at or below this use the minimal external path (6)
    pub medium_threshold: u8,
}

impl Default for ComplexityConfig {
    fn default() -> Self {
        Self {
            simple_threshold: 3,
            medium_threshold: 6,
        }
    }
}

impl ComplexityConfig {
    /// Validate threshold ordering
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidRange` unless `simple <= medium <= 10`.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.simple_threshold > self.medium_threshold
            || self.medium_threshold > limits::MAX_COMPLEXITY_SCORE
        {
            return Err(ConfigError::InvalidRange(
                "complexity thresholds must satisfy simple <= medium <= 10",
            ));
        }
        Ok(())
    }
}
