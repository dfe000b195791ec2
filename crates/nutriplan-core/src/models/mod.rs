// ABOUTME: Core data models and types for the nutriplan service
// ABOUTME: Re-exports patient input, nutrition metrics, meal plan and complexity structures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! Typed records flowing through the meal-plan pipeline:
//!
//! - `PatientProfile`: validated anthropometric and clinical input
//! - `NutritionProfile`: metrics derived once per request
//! - `FoodEntry` / `FoodItem` / `Meal` / `DietPlan`: reference data and the assembled plan
//! - `ComplexityScore` / `GenerationStrategy`: routing decision inputs and outputs
//!
//! Wire names follow the pt-BR field names used by the existing web form
//! (`nome`, `peso`, `tipo_dieta`, ...); English aliases are accepted too.

mod complexity;
mod nutrition;
mod patient;
mod plan;

pub use complexity::{ComplexityFactor, ComplexityScore, GenerationStrategy};
pub use nutrition::{
    BmiClass, CardiovascularAssessment, CardiovascularRisk, IdealWeightRange, MacroSplit,
    MealAllocation, MealDistribution, MealSlot, NutritionProfile, Objective,
};
pub use patient::{ActivityLevel, DeficitLevel, DietType, PatientProfile, Sex};
pub use plan::{DietPlan, FoodEntry, FoodGroup, FoodItem, Meal, NutritionalSummary};
