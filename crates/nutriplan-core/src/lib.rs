// ABOUTME: Core types and constants for the nutriplan meal-plan service
// ABOUTME: Foundation crate with error handling, patient/plan models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Nutriplan Core
//!
//! Foundation crate providing shared types and constants for the nutriplan
//! meal-plan service. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Application-wide constants organized by domain
//! - **models**: Patient input, derived nutrition metrics, meals and plans

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (`PatientProfile`, `NutritionProfile`, `Meal`, `DietPlan`, ...)
pub mod models;
