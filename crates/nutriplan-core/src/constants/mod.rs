// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Energy conversion factors, validation limits, endpoints and service names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single large file.

/// Energy density of macronutrients
pub mod energy {
    /// kcal per gram of carbohydrate
    pub const KCAL_PER_GRAM_CARB: f64 = 4.0;
    /// kcal per gram of protein
    pub const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
    /// kcal per gram of fat
    pub const KCAL_PER_GRAM_FAT: f64 = 9.0;
    /// Grams of carbohydrate in one carb-counting exchange
    pub const GRAMS_PER_CHO_PORTION: f64 = 15.0;
    /// Millilitres of water recommended per kg of body weight
    pub const WATER_ML_PER_KG: f64 = 35.0;
}

/// Accepted ranges for patient input
pub mod limits {
    /// Minimum patient name length (after trim)
    pub const MIN_NAME_LEN: usize = 3;
    /// Age range in years
    pub const AGE_RANGE: (u32, u32) = (18, 100);
    /// Weight range in kg
    pub const WEIGHT_KG_RANGE: (f64, f64) = (40.0, 300.0);
    /// Height range in cm
    pub const HEIGHT_CM_RANGE: (f64, f64) = (140.0, 220.0);
    /// `HbA1c` range in percent
    pub const HBA1C_RANGE: (f64, f64) = (4.0, 15.0);
    /// Fasting glucose range in mg/dL
    pub const GLUCOSE_RANGE: (f64, f64) = (70.0, 400.0);
    /// Waist circumference range in cm
    pub const WAIST_CM_RANGE: (f64, f64) = (40.0, 250.0);
    /// Maximum complexity score
    pub const MAX_COMPLEXITY_SCORE: u8 = 10;
}

/// API endpoints
pub mod endpoints {
    /// Health check endpoint
    pub const HEALTH_CHECK: &str = "/health";
    /// Plan generation endpoint
    pub const GENERATE_DIET: &str = "/gerar-dieta";
    /// Calculation preview endpoint
    pub const CALCULATION_PREVIEW: &str = "/api/calcular-preview";
    /// Complexity analysis endpoint
    pub const ANALYZE_COMPLEXITY: &str = "/api/analyze-complexity";
    /// Usage statistics endpoint
    pub const STATS: &str = "/stats";
    /// Runtime configuration endpoint
    pub const CONFIG: &str = "/config";
    /// Patient records base path
    pub const PATIENTS: &str = "/api/pacientes";
}

/// Network ports
pub mod ports {
    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 8081;
}

/// Names of external services used in logs and error messages
pub mod services {
    /// Anthropic Messages API
    pub const ANTHROPIC: &str = "Anthropic API";
    /// OpenAI-compatible endpoint
    pub const OPENAI_COMPATIBLE: &str = "OpenAI-compatible API";
    /// Feegow medical records API
    pub const FEEGOW: &str = "Feegow API";
}

/// Service identity
pub mod service {
    /// Service name used in logs
    pub const SERVICE_NAME: &str = "nutriplan";
    /// Version reported by `/health`
    pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");
}
