// ABOUTME: Core data models re-exported from nutriplan-core
// ABOUTME: Patient profile, nutrition profile, meals, plans and complexity types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! - `PatientProfile`: intake form data, validated at the boundary
//! - `NutritionProfile`: metrics derived once per request
//! - `DietPlan`: the patient, their metrics and the five assembled meals
//! - `ComplexityScore` and `GenerationStrategy`: routing inputs and outputs

pub use nutriplan_core::models::*;
