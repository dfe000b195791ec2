// ABOUTME: PII-safe logging helpers for patient data and outbound credentials
// ABOUTME: Masks patient names, CPF numbers and emails before they reach the logs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! PII-safe logging for patient records
//!
//! Patient lookups log what was searched for and what came back. These helpers
//! keep those log lines useful for support without writing identifiers out in
//! full.
//!
//! ## Usage
//!
//! ```rust
//! use nutriplan_server::middleware::redaction::{mask_cpf, mask_name, RedactionConfig};
//!
//! let config = RedactionConfig::default();
//! assert_eq!(mask_name("Maria Aparecida Silva", &config), "M*** A*** S***");
//! assert_eq!(mask_cpf("123.456.789-09", &config), "***.***.***-09");
//! ```

use std::env;
use std::sync::OnceLock;

use bitflags::bitflags;
use regex::Regex;

bitflags! {
    /// Which kinds of data get redacted
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RedactionFeatures: u8 {
        /// Patient names
        const NAMES = 0b001;
        /// CPF numbers
        const DOCUMENTS = 0b010;
        /// Email addresses
        const EMAILS = 0b100;
        /// Everything
        const ALL = Self::NAMES.bits()
            | Self::DOCUMENTS.bits()
            | Self::EMAILS.bits();
    }
}

/// Configuration for PII redaction
#[derive(Debug, Clone)]
pub struct RedactionConfig {
    /// Enable redaction globally
    pub enabled: bool,
    /// Which redaction features to enable
    pub features: RedactionFeatures,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            features: RedactionFeatures::ALL,
        }
    }
}

impl RedactionConfig {
    /// Read `LOG_REDACT_PII`; redaction stays on unless it is `false` or `0`
    #[must_use]
    pub fn from_env() -> Self {
        let enabled = env::var("LOG_REDACT_PII")
            .map_or(true, |v| !matches!(v.trim().to_lowercase().as_str(), "false" | "0"));
        Self::with_enabled(enabled)
    }

    /// All features on or all off
    #[must_use]
    pub fn with_enabled(enabled: bool) -> Self {
        Self {
            enabled,
            features: if enabled {
                RedactionFeatures::ALL
            } else {
                RedactionFeatures::empty()
            },
        }
    }

    fn applies(&self, feature: RedactionFeatures) -> bool {
        self.enabled && self.features.contains(feature)
    }
}

/// Keep the initial of every word of a name
#[must_use]
pub fn mask_name(name: &str, config: &RedactionConfig) -> String {
    if !config.applies(RedactionFeatures::NAMES) {
        return name.to_owned();
    }
    name.split_whitespace()
        .map(|word| {
            word.chars()
                .next()
                .map_or_else(String::new, |initial| format!("{initial}***"))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn cpf_regex() -> Option<&'static Regex> {
    static CPF_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    CPF_REGEX
        .get_or_init(|| Regex::new(r"\b\d{3}\.?\d{3}\.?\d{3}-?(\d{2})\b").ok())
        .as_ref()
}

/// Mask every CPF in `text`, keeping the two check digits
#[must_use]
pub fn mask_cpf(text: &str, config: &RedactionConfig) -> String {
    if !config.applies(RedactionFeatures::DOCUMENTS) {
        return text.to_owned();
    }
    cpf_regex().map_or_else(
        || text.to_owned(),
        |regex| {
            regex
                .replace_all(text, |caps: &regex::Captures| {
                    format!("***.***.***-{}", &caps[1])
                })
                .into_owned()
        },
    )
}

fn email_regex() -> Option<&'static Regex> {
    static EMAIL_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL_REGEX
        .get_or_init(|| Regex::new(r"([A-Za-z0-9._%+-])[A-Za-z0-9._%+-]*@([A-Za-z0-9.-]+)").ok())
        .as_ref()
}

/// Mask the local part of every email in `text`
#[must_use]
pub fn mask_email(text: &str, config: &RedactionConfig) -> String {
    if !config.applies(RedactionFeatures::EMAILS) {
        return text.to_owned();
    }
    email_regex().map_or_else(
        || text.to_owned(),
        |regex| regex.replace_all(text, "$1***@$2").into_owned(),
    )
}
