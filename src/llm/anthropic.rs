// ABOUTME: Anthropic Messages API provider for plan narrative generation
// ABOUTME: Sends a single non-streaming request with a bounded timeout and classifies API errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Anthropic Provider
//!
//! Implementation of the `LlmProvider` trait over the Anthropic Messages API.
//!
//! ## Configuration
//!
//! - `ANTHROPIC_API_KEY`: required
//! - `ANTHROPIC_MODEL`: defaults to `claude-sonnet-4-5-20250929`
//! - `LLM_TIMEOUT_SECS`: request deadline, defaults to 60

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};

use super::{
    ChatMessage, ChatRequest, ChatResponse, LlmCapabilities, LlmProvider, MessageRole, TokenUsage,
};
use crate::constants::services::ANTHROPIC;
use crate::errors::{AppError, ErrorCode};

/// Environment variable for the Anthropic API key
const ANTHROPIC_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Environment variable for the model
const ANTHROPIC_MODEL_ENV: &str = "ANTHROPIC_MODEL";

/// Default model
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";

/// Base URL for the Anthropic API
const API_BASE_URL: &str = "https://api.anthropic.com/v1";

/// API version header value
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Request deadline when none is configured
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Used when a request does not set `max_tokens`, which the API requires
const FALLBACK_MAX_TOKENS: u32 = 1024;

// ============================================================================
// API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<AnthropicMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize)]
struct AnthropicMessage {
    role: &'static str,
    content: String,
}

impl From<&ChatMessage> for AnthropicMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role.as_str(),
            content: msg.content.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    model: String,
    stop_reason: Option<String>,
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorResponse {
    error: AnthropicErrorDetail,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorDetail {
    #[serde(rename = "type")]
    error_type: String,
    message: String,
}

// ============================================================================
// Provider Configuration
// ============================================================================

/// Settings for [`AnthropicProvider`]
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// API key
    pub api_key: String,
    /// Model used when a request does not name one
    pub default_model: String,
    /// Base URL, overridable for tests
    pub base_url: String,
    /// Whole-request deadline
    pub timeout: Duration,
}

impl AnthropicConfig {
    /// Configuration with the public endpoint and default model
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            default_model: DEFAULT_MODEL.to_owned(),
            base_url: API_BASE_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Override the model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Override the request deadline
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Anthropic Messages API provider
pub struct AnthropicProvider {
    client: Client,
    config: AnthropicConfig,
}

impl AnthropicProvider {
    /// Create a provider with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created
    pub fn new(config: AnthropicConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Create a provider from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `ANTHROPIC_API_KEY` is not set
    pub fn from_env() -> Result<Self, AppError> {
        let api_key = env::var(ANTHROPIC_API_KEY_ENV)
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AppError::config_missing(ANTHROPIC_API_KEY_ENV))?;
        let model = env::var(ANTHROPIC_MODEL_ENV).unwrap_or_else(|_| DEFAULT_MODEL.to_owned());

        Self::new(AnthropicConfig::new(api_key).with_model(model))
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.config.base_url.trim_end_matches('/'))
    }

    fn timeout_secs(&self) -> u64 {
        self.config.timeout.as_secs()
    }

    /// Map a transport failure, keeping timeouts distinguishable
    fn transport_error(&self, e: &reqwest::Error) -> AppError {
        if e.is_timeout() {
            AppError::external_timeout(ANTHROPIC, self.timeout_secs())
        } else if e.is_connect() {
            AppError::external_unavailable(ANTHROPIC, format!("Failed to connect: {e}"))
        } else {
            AppError::external_service(ANTHROPIC, format!("Request failed: {e}"))
        }
    }

    /// Parse error response from the Anthropic API
    fn parse_error_response(status: StatusCode, body: &str) -> AppError {
        let detail = serde_json::from_str::<AnthropicErrorResponse>(body).map_or_else(
            |_| body.chars().take(200).collect::<String>(),
            |r| format!("{} - {}", r.error.error_type, r.error.message),
        );

        match status.as_u16() {
            401 | 403 => AppError::new(
                ErrorCode::ExternalAuthFailed,
                format!("{ANTHROPIC} authentication failed: {detail}"),
            ),
            429 => AppError::new(
                ErrorCode::ExternalRateLimited,
                format!("{ANTHROPIC} rate limit exceeded: {detail}"),
            ),
            // 529 is Anthropic's "overloaded"
            500..=599 => AppError::external_unavailable(ANTHROPIC, format!("HTTP {status}: {detail}")),
            _ => AppError::external_service(ANTHROPIC, format!("HTTP {status}: {detail}")),
        }
    }

    fn build_request(&self, request: &ChatRequest) -> MessagesRequest {
        MessagesRequest {
            model: request
                .model
                .clone()
                .unwrap_or_else(|| self.config.default_model.clone()),
            max_tokens: request.max_tokens.unwrap_or(FALLBACK_MAX_TOKENS),
            messages: request
                .messages
                .iter()
                .filter(|m| m.role != MessageRole::System)
                .map(AnthropicMessage::from)
                .collect(),
            system: request.system_prompt(),
            temperature: request.temperature,
        }
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    fn display_name(&self) -> &'static str {
        "Anthropic Claude"
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::SYSTEM_MESSAGES | LlmCapabilities::LONG_OUTPUT
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    #[instrument(skip(self, request), fields(model = %request.model.as_deref().unwrap_or(&self.config.default_model)))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let body = self.build_request(request);
        debug!(max_tokens = body.max_tokens, "Sending messages request to Anthropic");

        let response = self
            .client
            .post(self.api_url("messages"))
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send request to Anthropic API: {}", e);
                self.transport_error(&e)
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            error!("Failed to read Anthropic API response: {}", e);
            self.transport_error(&e)
        })?;

        if !status.is_success() {
            return Err(Self::parse_error_response(status, &text));
        }

        let parsed: MessagesResponse = serde_json::from_str(&text).map_err(|e| {
            error!("Failed to parse Anthropic API response: {}", e);
            AppError::serialization(format!("{ANTHROPIC}: failed to parse response: {e}"))
        })?;

        let content: String = parsed
            .content
            .into_iter()
            .filter(|block| block.block_type == "text")
            .filter_map(|block| block.text)
            .collect();

        if content.trim().is_empty() {
            return Err(AppError::serialization(format!(
                "{ANTHROPIC}: response contained no text"
            )));
        }

        debug!(
            chars = content.len(),
            stop_reason = ?parsed.stop_reason,
            "Received response from Anthropic"
        );

        Ok(ChatResponse {
            content,
            model: parsed.model,
            usage: parsed
                .usage
                .map(|u| TokenUsage::new(u.input_tokens, u.output_tokens)),
            finish_reason: parsed.stop_reason,
        })
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<bool, AppError> {
        let response = self
            .client
            .get(self.api_url("models"))
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let healthy = response.status().is_success();
        if !healthy {
            warn!("Anthropic health check failed with status: {}", response.status());
        }
        Ok(healthy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let auth = AnthropicProvider::parse_error_response(
            StatusCode::UNAUTHORIZED,
            r#"{"type":"error","error":{"type":"authentication_error","message":"invalid x-api-key"}}"#,
        );
        assert_eq!(auth.code, ErrorCode::ExternalAuthFailed);
        assert!(auth.message.contains("invalid x-api-key"));

        let limited = AnthropicProvider::parse_error_response(StatusCode::TOO_MANY_REQUESTS, "slow down");
        assert_eq!(limited.code, ErrorCode::ExternalRateLimited);

        let overloaded = AnthropicProvider::parse_error_response(
            StatusCode::from_u16(529).unwrap(),
            r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#,
        );
        assert_eq!(overloaded.code, ErrorCode::ExternalServiceUnavailable);

        let bad = AnthropicProvider::parse_error_response(StatusCode::BAD_REQUEST, "nope");
        assert_eq!(bad.code, ErrorCode::ExternalServiceError);
    }

    #[test]
    fn test_system_messages_move_out_of_band() {
        let provider = AnthropicProvider::new(AnthropicConfig::new("key")).unwrap();
        let request = ChatRequest::new(vec![
            ChatMessage::system("be formal"),
            ChatMessage::user("write"),
        ])
        .with_max_tokens(800);

        let body = provider.build_request(&request);
        assert_eq!(body.system.as_deref(), Some("be formal"));
        assert_eq!(body.messages.len(), 1);
        assert_eq!(body.messages[0].role, "user");
        assert_eq!(body.max_tokens, 800);
        assert_eq!(body.model, DEFAULT_MODEL);
    }
}
