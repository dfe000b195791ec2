// ABOUTME: Meal-plan computation engine: calculator, food table, assembler, complexity analyzer
// ABOUTME: Synchronous and side-effect free apart from the injected random source
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Nutriplan Intelligence
//!
//! The deterministic half of plan generation:
//!
//! - **`nutrition_calculator`**: metabolic rate, energy need, macro split, per-meal budgets
//! - **`food_table`**: the embedded food catalog and slot eligibility lists
//! - **`meal_assembler`**: role-based food choice and portion scaling
//! - **`complexity_analyzer`**: clinical complexity score and routing recommendation
//! - **`config`**: the constant tables all of the above are parameterized by

/// Constant tables injected into the engine
pub mod config;

/// Scores cases to pick a generation strategy
pub mod complexity_analyzer;

/// Embedded food catalog
pub mod food_table;

/// Role-based meal assembly
pub mod meal_assembler;

/// Metabolic and macro formulas
pub mod nutrition_calculator;

pub use complexity_analyzer::ComplexityAnalyzer;
pub use config::{AssemblerConfig, ComplexityConfig, DietAdjustment, NutritionConfig};
pub use food_table::FoodTable;
pub use meal_assembler::{
    nutritional_summary, FoodPicker, MealAssembler, SeededPicker, UniformPicker,
};
pub use nutrition_calculator::compute_nutrition_profile;
