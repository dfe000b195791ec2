// ABOUTME: Derived nutrition metrics computed once per request from patient data
// ABOUTME: BMI class, cardiovascular risk, macro split and the per-meal calorie distribution
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;

/// WHO body-mass-index classification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BmiClass {
    /// BMI < 18.5
    Underweight,
    /// 18.5 <= BMI < 25
    Normal,
    /// 25 <= BMI < 30
    Overweight,
    /// 30 <= BMI < 35
    ObesityGrade1,
    /// 35 <= BMI < 40
    ObesityGrade2,
    /// BMI >= 40
    ObesityGrade3,
}

impl BmiClass {
    /// pt-BR label used in documents and API responses
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Underweight => "Abaixo do peso",
            Self::Normal => "Peso normal",
            Self::Overweight => "Sobrepeso",
            Self::ObesityGrade1 => "Obesidade grau I",
            Self::ObesityGrade2 => "Obesidade grau II",
            Self::ObesityGrade3 => "Obesidade grau III",
        }
    }

    /// Whether the class is any obesity grade
    #[must_use]
    pub const fn is_obese(self) -> bool {
        matches!(
            self,
            Self::ObesityGrade1 | Self::ObesityGrade2 | Self::ObesityGrade3
        )
    }
}

impl fmt::Display for BmiClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Cardiovascular risk derived from the waist-to-height ratio
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum CardiovascularRisk {
    /// Below the first sex-specific cut-off
    Low,
    /// Between the first and second cut-offs
    Moderate,
    /// Between the second and third cut-offs
    Elevated,
    /// At or above the third cut-off
    VeryElevated,
}

impl CardiovascularRisk {
    /// pt-BR label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Baixo",
            Self::Moderate => "Moderado",
            Self::Elevated => "Elevado",
            Self::VeryElevated => "Risco muito aumentado",
        }
    }

    /// Elevated or very elevated
    #[must_use]
    pub const fn is_elevated(self) -> bool {
        matches!(self, Self::Elevated | Self::VeryElevated)
    }
}

impl fmt::Display for CardiovascularRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ratio and risk class for a waist measurement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CardiovascularAssessment {
    /// Waist / height
    pub waist_to_height_ratio: f64,
    /// Risk class
    pub risk: CardiovascularRisk,
}

/// Healthy weight range for a height
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct IdealWeightRange {
    /// Weight at BMI 18.5, kg
    pub min_kg: f64,
    /// Weight at BMI 24.9, kg
    pub max_kg: f64,
    /// Lorentz point estimate, kg
    pub ideal_kg: f64,
}

/// Daily macronutrient targets
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct MacroSplit {
    /// Carbohydrate grams
    pub carb_g: f64,
    /// Protein grams
    pub protein_g: f64,
    /// Fat grams
    pub fat_g: f64,
    /// Carbohydrate kcal
    pub carb_kcal: f64,
    /// Protein kcal
    pub protein_kcal: f64,
    /// Fat kcal
    pub fat_kcal: f64,
    /// Carbohydrate share of calories
    pub carb_percent: f64,
    /// Protein share of calories
    pub protein_percent: f64,
    /// Fat share of calories
    pub fat_percent: f64,
}

/// The five daily meal slots, in chronological order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum MealSlot {
    /// Breakfast, 07:00
    Breakfast,
    /// Lunch, 12:00
    Lunch,
    /// Afternoon snack, 15:00
    Snack,
    /// Dinner, 19:00
    Dinner,
    /// Late supper, 21:30
    Supper,
}

impl MealSlot {
    /// All slots in output order
    pub const ALL: [Self; 5] = [
        Self::Breakfast,
        Self::Lunch,
        Self::Snack,
        Self::Dinner,
        Self::Supper,
    ];

    /// Key used by the food reference table
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Snack => "snack",
            Self::Dinner => "dinner",
            Self::Supper => "supper",
        }
    }

    /// pt-BR meal name
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Breakfast => "Café da Manhã",
            Self::Lunch => "Almoço",
            Self::Snack => "Lanche da Tarde",
            Self::Dinner => "Jantar",
            Self::Supper => "Ceia",
        }
    }

    /// Suggested time of day
    #[must_use]
    pub const fn default_time(self) -> &'static str {
        match self {
            Self::Breakfast => "07:00",
            Self::Lunch => "12:00",
            Self::Snack => "15:00",
            Self::Dinner => "19:00",
            Self::Supper => "21:30",
        }
    }

    /// Parse a table key
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.key() == key)
    }
}

/// Calorie budget for one meal slot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MealAllocation {
    /// Slot
    pub slot: MealSlot,
    /// Display name (pt-BR)
    pub name: String,
    /// Suggested time, `HH:MM`
    pub time: String,
    /// Share of daily calories, percent
    pub percent: f64,
    /// Calorie budget
    pub kcal: f64,
}

/// Daily calories split across the five slots
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MealDistribution {
    /// One allocation per slot, in slot order
    pub allocations: Vec<MealAllocation>,
}

impl MealDistribution {
    /// Allocation for a slot
    #[must_use]
    pub fn get(&self, slot: MealSlot) -> Option<&MealAllocation> {
        self.allocations.iter().find(|a| a.slot == slot)
    }

    /// Sum of all slot percentages
    #[must_use]
    pub fn total_percent(&self) -> f64 {
        self.allocations.iter().map(|a| a.percent).sum()
    }

    /// Sum of all slot budgets
    #[must_use]
    pub fn total_kcal(&self) -> f64 {
        self.allocations.iter().map(|a| a.kcal).sum()
    }
}

/// Caloric objective suggested from BMI
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    /// Keep current weight
    Maintenance,
    /// Lose slowly
    MildLoss,
    /// Lose at the usual clinical pace
    ModerateLoss,
    /// Lose quickly
    IntenseLoss,
    /// Gain slowly
    MildGain,
    /// Gain at a moderate pace
    ModerateGain,
}

impl Objective {
    /// Multiplier applied to total energy need
    #[must_use]
    pub const fn factor(self) -> f64 {
        match self {
            Self::Maintenance => 1.0,
            Self::MildLoss => 0.85,
            Self::ModerateLoss => 0.80,
            Self::IntenseLoss => 0.70,
            Self::MildGain => 1.10,
            Self::ModerateGain => 1.15,
        }
    }

    /// pt-BR label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Maintenance => "Manutenção do peso",
            Self::MildLoss => "Perda de peso leve",
            Self::ModerateLoss => "Perda de peso moderada",
            Self::IntenseLoss => "Perda de peso intensa",
            Self::MildGain => "Ganho de peso leve",
            Self::ModerateGain => "Ganho de peso moderado",
        }
    }
}

/// Metrics derived from a validated patient
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NutritionProfile {
    /// Mifflin-St Jeor basal metabolic rate, kcal/day
    pub basal_metabolic_rate: f64,
    /// BMR times activity factor, kcal/day
    pub total_energy_need: f64,
    /// Energy need after deficit, never below the floor
    pub target_calories: f64,
    /// kg/m²
    pub body_mass_index: f64,
    /// Classification of `body_mass_index`
    pub bmi_class: BmiClass,
    /// Daily macro targets for `target_calories`
    pub macro_split: MacroSplit,
    /// Per-slot calorie budgets
    pub meal_distribution: MealDistribution,
    /// Present only when a waist was given
    pub cardiovascular_risk: Option<CardiovascularRisk>,
    /// Present only when a waist was given
    pub waist_to_height_ratio: Option<f64>,
    /// Healthy weight range for the patient's height
    pub ideal_weight: IdealWeightRange,
    /// Recommended daily water, litres
    pub water_liters: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_keys_round_trip() {
        for slot in MealSlot::ALL {
            assert_eq!(MealSlot::from_key(slot.key()), Some(slot));
        }
        assert_eq!(MealSlot::from_key("brunch"), None);
    }

    #[test]
    fn test_risk_ordering_and_elevation() {
        assert!(CardiovascularRisk::Low < CardiovascularRisk::VeryElevated);
        assert!(!CardiovascularRisk::Moderate.is_elevated());
        assert!(CardiovascularRisk::Elevated.is_elevated());
        assert_eq!(
            CardiovascularRisk::VeryElevated.to_string(),
            "Risco muito aumentado"
        );
    }

    #[test]
    fn test_bmi_class_labels() {
        assert_eq!(BmiClass::ObesityGrade1.label(), "Obesidade grau I");
        assert!(BmiClass::ObesityGrade3.is_obese());
        assert!(!BmiClass::Overweight.is_obese());
    }
}
