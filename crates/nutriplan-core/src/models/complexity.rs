// ABOUTME: Complexity score and generation strategy types for plan routing
// ABOUTME: Strategy wire names stay compatible with existing web clients
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the narrative of a plan is produced
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum GenerationStrategy {
    /// Local templates only, no external cost
    #[serde(rename = "python_only")]
    LocalOnly,
    /// Decide from the complexity score
    #[default]
    #[serde(rename = "auto")]
    Auto,
    /// External generator writes the presentation only
    #[serde(rename = "api_minimal")]
    ExternalMinimal,
    /// External generator writes the whole document
    #[serde(rename = "api_full")]
    ExternalFull,
}

impl GenerationStrategy {
    /// Every strategy, in menu order
    pub const ALL: [Self; 4] = [
        Self::LocalOnly,
        Self::Auto,
        Self::ExternalMinimal,
        Self::ExternalFull,
    ];

    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LocalOnly => "python_only",
            Self::Auto => "auto",
            Self::ExternalMinimal => "api_minimal",
            Self::ExternalFull => "api_full",
        }
    }

    /// Whether the strategy calls the external generator
    #[must_use]
    pub const fn is_external(self) -> bool {
        matches!(self, Self::ExternalMinimal | Self::ExternalFull)
    }
}

impl fmt::Display for GenerationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationStrategy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == normalized)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|m| m.as_str()).collect();
                AppError::invalid_input(format!("Invalid mode: {s}. Use: {}", valid.join(", ")))
                    .with_details(serde_json::json!({ "valid_modes": valid }))
            })
    }
}

/// One contribution to a complexity score
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComplexityFactor {
    /// Stable machine name, e.g. `hba1c_high`
    pub name: String,
    /// Points added
    pub score: u8,
    /// pt-BR description with the triggering value
    pub description: String,
}

/// Result of analyzing how much a case benefits from external generation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComplexityScore {
    /// Clamped total, 0..=10
    pub score: u8,
    /// Factors that fired, in evaluation order
    pub factors: Vec<ComplexityFactor>,
    /// Suggested strategy for this score
    pub recommendation: GenerationStrategy,
    /// Why the recommendation was made
    pub rationale: String,
    /// One-line clinical summary
    pub patient_summary: String,
}

impl ComplexityScore {
    /// Factor descriptions, for metadata
    #[must_use]
    pub fn factor_descriptions(&self) -> Vec<String> {
        self.factors.iter().map(|f| f.description.clone()).collect()
    }
}
