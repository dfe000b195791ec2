// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Reads server, generation, LLM, patient-records and usage settings from env vars
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration management for production deployment

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::types::{Environment, LlmProviderType, LogLevel};
use crate::constants::ports::DEFAULT_HTTP_PORT;
use crate::errors::AppResult;
use crate::generation::{LlmTextGenerator, PriceTable, TextGenerator};
use crate::intelligence::ComplexityConfig;
use crate::llm::{
    AnthropicConfig, AnthropicProvider, LlmProvider, OpenAiCompatibleConfig,
    OpenAiCompatibleProvider, ANTHROPIC_DEFAULT_MODEL,
    OPENAI_COMPATIBLE_DEFAULT_BASE_URL as OPENAI_DEFAULT_BASE_URL,
    OPENAI_COMPATIBLE_DEFAULT_MODEL as OPENAI_DEFAULT_MODEL,
};
use crate::models::GenerationStrategy;

/// Default Feegow API base URL
pub const DEFAULT_FEEGOW_API_URL: &str = "https://api.feegow.com.br/v1/api";

/// Default location of the usage stats file
pub const DEFAULT_USAGE_STATS_PATH: &str = "data/usage_stats.json";

/// Strategy routing and pricing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Strategy used when a request names none
    pub default_mode: GenerationStrategy,
    /// Score thresholds
    pub complexity: ComplexityConfig,
    /// USD per generation
    pub prices: PriceTable,
    /// Record usage events
    pub cost_tracking: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            default_mode: GenerationStrategy::Auto,
            complexity: ComplexityConfig::default(),
            prices: PriceTable::default(),
            cost_tracking: true,
        }
    }
}

/// External text generator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Which backend to build
    pub provider: LlmProviderType,
    /// Anthropic key; absent disables the Anthropic backend
    #[serde(skip_serializing)]
    pub anthropic_api_key: Option<String>,
    /// Anthropic model
    pub anthropic_model: String,
    /// `OpenAI`-compatible endpoint
    pub openai_base_url: String,
    /// `OpenAI`-compatible key, optional for local servers
    #[serde(skip_serializing)]
    pub openai_api_key: Option<String>,
    /// `OpenAI`-compatible model
    pub openai_model: String,
    /// Output budget for the presentation prompt
    pub max_tokens_minimal: u32,
    /// Output budget for the full-document prompt
    pub max_tokens_full: u32,
    /// Deadline for one generation, seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProviderType::default(),
            anthropic_api_key: None,
            anthropic_model: ANTHROPIC_DEFAULT_MODEL.to_owned(),
            openai_base_url: OPENAI_DEFAULT_BASE_URL.to_owned(),
            openai_api_key: None,
            openai_model: OPENAI_DEFAULT_MODEL.to_owned(),
            max_tokens_minimal: 800,
            max_tokens_full: 8000,
            timeout_secs: 60,
        }
    }
}

impl LlmConfig {
    /// Whether external generation can be attempted at all
    #[must_use]
    pub const fn is_available(&self) -> bool {
        match self.provider {
            LlmProviderType::Anthropic => self.anthropic_api_key.is_some(),
            LlmProviderType::OpenAiCompatible => true,
        }
    }

    /// Model requests will use
    #[must_use]
    pub fn model(&self) -> &str {
        match self.provider {
            LlmProviderType::Anthropic => &self.anthropic_model,
            LlmProviderType::OpenAiCompatible => &self.openai_model,
        }
    }

    /// Deadline for one generation
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Build the configured text generator, `None` when no credentials are set
    ///
    /// # Errors
    ///
    /// Returns an error if the provider's HTTP client cannot be created
    pub fn build_generator(&self) -> AppResult<Option<Arc<dyn TextGenerator>>> {
        let provider: Arc<dyn LlmProvider> = match self.provider {
            LlmProviderType::Anthropic => {
                let Some(key) = &self.anthropic_api_key else {
                    return Ok(None);
                };
                Arc::new(AnthropicProvider::new(
                    AnthropicConfig::new(key.clone())
                        .with_model(self.anthropic_model.clone())
                        .with_timeout(self.timeout()),
                )?)
            }
            LlmProviderType::OpenAiCompatible => {
                Arc::new(OpenAiCompatibleProvider::new(OpenAiCompatibleConfig {
                    base_url: self.openai_base_url.clone(),
                    api_key: self.openai_api_key.clone(),
                    default_model: self.openai_model.clone(),
                    timeout: self.timeout(),
                })?)
            }
        };
        Ok(Some(Arc::new(LlmTextGenerator::new(provider))))
    }
}

/// Feegow medical-records settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeegowConfig {
    /// Access token; absent disables the integration
    #[serde(skip_serializing)]
    pub api_token: Option<String>,
    /// API base URL
    pub api_url: String,
    /// Request deadline, seconds
    pub timeout_secs: u64,
}

impl Default for FeegowConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            api_url: DEFAULT_FEEGOW_API_URL.to_owned(),
            timeout_secs: 30,
        }
    }
}

/// Usage stats storage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UsageConfig {
    /// JSON stats file
    pub storage_path: PathBuf,
    /// Keep stats in memory only (read-only filesystems)
    pub read_only: bool,
}

impl Default for UsageConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from(DEFAULT_USAGE_STATS_PATH),
            read_only: false,
        }
    }
}

/// Allowed browser origins
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CorsConfig {
    /// Origins, or `*` for any
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_owned()],
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Log level
    pub log_level: LogLevel,
    /// CORS policy
    pub cors: CorsConfig,
    /// Routing and pricing
    pub generation: GenerationConfig,
    /// External text generator
    pub llm: LlmConfig,
    /// Patient records
    pub feegow: FeegowConfig,
    /// Usage stats
    pub usage: UsageConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but cannot be parsed, or if
    /// the resulting configuration is inconsistent
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let default_mode = env_var_or("DEFAULT_GENERATION_MODE", "auto")
            .parse::<GenerationStrategy>()
            .map_err(|e| anyhow!("Invalid DEFAULT_GENERATION_MODE value: {e}"))?;

        let config = Self {
            http_port: env_parse_or("HTTP_PORT", DEFAULT_HTTP_PORT)?,
            environment: Environment::from_str_or_default(&env_var_or("ENVIRONMENT", "development")),
            log_level: LogLevel::from_str_or_default(&env_var_or("LOG_LEVEL", "info")),
            cors: CorsConfig {
                allowed_origins: parse_origins(&env_var_or("CORS_ALLOWED_ORIGINS", "*")),
            },
            generation: GenerationConfig {
                default_mode,
                complexity: ComplexityConfig {
                    simple_threshold: env_parse_or("COMPLEXITY_THRESHOLD_SIMPLE", 3)?,
                    medium_threshold: env_parse_or("COMPLEXITY_THRESHOLD_MEDIUM", 6)?,
                },
                prices: PriceTable {
                    local_only: env_parse_or("COST_PYTHON_ONLY", 0.0)?,
                    external_minimal: env_parse_or("COST_API_MINIMAL", 0.015)?,
                    external_full: env_parse_or("COST_API_FULL", 0.048)?,
                },
                cost_tracking: env_parse_or("ENABLE_COST_TRACKING", true)?,
            },
            llm: LlmConfig {
                provider: LlmProviderType::from_env(),
                anthropic_api_key: env_secret("ANTHROPIC_API_KEY"),
                anthropic_model: env_var_or("ANTHROPIC_MODEL", ANTHROPIC_DEFAULT_MODEL),
                openai_base_url: env_var_or("OPENAI_COMPATIBLE_BASE_URL", OPENAI_DEFAULT_BASE_URL),
                openai_api_key: env_secret("OPENAI_COMPATIBLE_API_KEY"),
                openai_model: env_var_or("OPENAI_COMPATIBLE_MODEL", OPENAI_DEFAULT_MODEL),
                max_tokens_minimal: env_parse_or("LLM_MAX_TOKENS_MINIMAL", 800)?,
                max_tokens_full: env_parse_or("LLM_MAX_TOKENS_FULL", 8000)?,
                timeout_secs: env_parse_or("LLM_TIMEOUT_SECS", 60)?,
            },
            feegow: FeegowConfig {
                api_token: env_secret("FEEGOW_API_TOKEN"),
                api_url: env_var_or("FEEGOW_API_URL", DEFAULT_FEEGOW_API_URL),
                ..FeegowConfig::default()
            },
            usage: UsageConfig {
                storage_path: PathBuf::from(env_var_or("USAGE_STATS_PATH", DEFAULT_USAGE_STATS_PATH)),
                read_only: env_parse_or("USAGE_STATS_READONLY", false)? || env::var("VERCEL").is_ok(),
            },
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error for inconsistent thresholds, negative prices or zero limits
    pub fn validate(&self) -> Result<()> {
        self.generation
            .complexity
            .validate()
            .map_err(|e| anyhow!("Invalid complexity thresholds: {e}"))?;

        let prices = &self.generation.prices;
        if [prices.local_only, prices.external_minimal, prices.external_full]
            .iter()
            .any(|p| !p.is_finite() || *p < 0.0)
        {
            return Err(anyhow!("Generation costs must be non-negative numbers"));
        }

        if self.llm.max_tokens_minimal == 0 || self.llm.max_tokens_full == 0 {
            return Err(anyhow!("LLM token limits must be positive"));
        }
        if self.llm.timeout_secs == 0 {
            return Err(anyhow!("LLM_TIMEOUT_SECS must be positive"));
        }

        if self.generation.default_mode.is_external() && !self.llm.is_available() {
            warn!(
                mode = %self.generation.default_mode,
                "Default mode needs an external generator but none is configured; requests will fall back to local templates"
            );
        }

        Ok(())
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        let enabled = |on: bool| if on { "Enabled" } else { "Disabled" };
        format!(
            "Nutriplan Server Configuration:\n\
             - HTTP Port: {}\n\
             - Environment: {}\n\
             - Log Level: {}\n\
             - Default Mode: {}\n\
             - Complexity Thresholds: simple <= {}, medium <= {}\n\
             - LLM Provider: {} ({})\n\
             - External Generation: {}\n\
             - Feegow Records: {}\n\
             - Cost Tracking: {}\n\
             - Usage Storage: {}",
            self.http_port,
            self.environment,
            self.log_level,
            self.generation.default_mode,
            self.generation.complexity.simple_threshold,
            self.generation.complexity.medium_threshold,
            self.llm.provider,
            self.llm.model(),
            enabled(self.llm.is_available()),
            enabled(self.feegow.api_token.is_some()),
            enabled(self.generation.cost_tracking),
            if self.usage.read_only {
                "memory".to_owned()
            } else {
                self.usage.storage_path.display().to_string()
            },
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Non-empty environment variable
fn env_secret(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse an environment variable, using `default` when it is unset
fn env_parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("Invalid {key} value '{raw}': {e}")),
        Err(_) => Ok(default),
    }
}

/// Parse comma-separated CORS origins
fn parse_origins(origins_str: &str) -> Vec<String> {
    if origins_str.trim() == "*" {
        vec!["*".to_owned()]
    } else {
        origins_str
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins() {
        assert_eq!(parse_origins("*"), vec!["*"]);
        assert_eq!(
            parse_origins("https://a.example, https://b.example,"),
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = ServerConfig {
            http_port: DEFAULT_HTTP_PORT,
            ..ServerConfig::default()
        };
        assert!(config.validate().is_ok());
        assert!(!config.llm.is_available());
        assert!(config.summary().contains("Default Mode: auto"));
    }

    #[test]
    fn test_unavailable_generator_builds_none() {
        let generator = LlmConfig::default().build_generator().unwrap();
        assert!(generator.is_none());
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut config = ServerConfig::default();
        config.generation.prices.external_full = -1.0;
        assert!(config.validate().is_err());
    }
}
