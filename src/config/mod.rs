// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Environment-driven server, generation, LLM, records and usage configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module for the nutriplan server
//!
//! All settings come from environment variables:
//!
//! - **Environment**: server port, CORS, routing thresholds, prices, LLM and Feegow credentials
//! - **Types**: `LogLevel`, `Environment` and `LlmProviderType`

/// Environment and server configuration
pub mod environment;
/// Shared configuration enums
pub mod types;

pub use environment::{
    CorsConfig, FeegowConfig, GenerationConfig, LlmConfig, ServerConfig, UsageConfig,
    DEFAULT_FEEGOW_API_URL, DEFAULT_USAGE_STATS_PATH,
};
pub use types::{Environment, LlmProviderType, LogLevel};
