// ABOUTME: Route module organization for the meal plan HTTP API
// ABOUTME: Groups route definitions by domain; handlers delegate to the router and records client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module for the meal plan service
//!
//! Each domain module contains only route definitions and thin handler
//! functions that delegate to [`HybridOrchestrator`](crate::generation::HybridOrchestrator)
//! or [`PatientRecords`](crate::external::PatientRecords).

/// Calculation preview and complexity analysis
pub mod analysis;
/// Plan generation
pub mod diet;
/// Health check
pub mod health;
/// Patient records proxy
pub mod records;
/// Usage statistics and runtime configuration
pub mod stats;

pub use analysis::{calculation_preview, AnalysisRoutes, CalculationPreview, PreviewQuery};
pub use diet::{diet_filename, DietRoutes, GenerateDietResponse, GenerateQuery};
pub use health::HealthRoutes;
pub use records::{RecordsRoutes, UploadDietRequest};
pub use stats::{StatsQuery, StatsRoutes};
