// ABOUTME: Plan generation: text generator contract, prompt builders and the hybrid router
// ABOUTME: Wraps LLM providers behind a narrow trait with a typed, always-recoverable error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Plan Generation
//!
//! The router decides per request whether a plan narrative comes from the
//! local templates or from an external language model. The external side is
//! reached only through [`TextGenerator`], so tests and alternative backends
//! plug in without touching the router.

/// Prompts sent to the external generator
pub mod prompts;

/// Strategy resolution, dispatch and fallback
pub mod router;

pub use router::{
    GenerationMetadata, GenerationOutcome, HybridOrchestrator, MacroTotals, PickerFactory,
    PriceTable,
};

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::errors::{AppError, ErrorCode};
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};

/// What a generation request is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationPurpose {
    /// Three-paragraph presentation spliced into the local document
    Presentation,
    /// Whole markdown document
    FullDocument,
}

impl fmt::Display for GenerationPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Presentation => f.write_str("presentation"),
            Self::FullDocument => f.write_str("full_document"),
        }
    }
}

/// A single prompt for the external generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextGenerationRequest {
    /// User prompt
    pub prompt: String,
    /// Output budget
    pub max_tokens: u32,
    /// What the text is for
    pub purpose: GenerationPurpose,
}

/// Text returned by the external generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedText {
    /// Generated markdown
    pub text: String,
    /// Input plus output tokens
    pub tokens_used: u32,
}

/// Why an external generation attempt failed
///
/// Every variant is recovered by the router's local fallback.
#[derive(Debug, Error)]
pub enum ExternalGenerationError {
    /// No answer within the deadline
    #[error("external generator timed out after {0}s")]
    Timeout(u64),
    /// Credentials rejected
    #[error("external generator rejected credentials: {0}")]
    Auth(String),
    /// Throttled by the provider
    #[error("external generator rate limited: {0}")]
    RateLimited(String),
    /// Response could not be used
    #[error("external generator returned an unusable response: {0}")]
    Malformed(String),
    /// Provider unreachable or not configured
    #[error("external generator unavailable: {0}")]
    Unavailable(String),
    /// Any other provider failure
    #[error("external generator failed: {0}")]
    Provider(#[source] AppError),
}

impl ExternalGenerationError {
    /// Short machine label for logs and metrics
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Timeout(_) => "timeout",
            Self::Auth(_) => "auth",
            Self::RateLimited(_) => "rate_limited",
            Self::Malformed(_) => "malformed",
            Self::Unavailable(_) => "unavailable",
            Self::Provider(_) => "provider",
        }
    }
}

impl From<AppError> for ExternalGenerationError {
    fn from(error: AppError) -> Self {
        match error.code {
            ErrorCode::ExternalAuthFailed => Self::Auth(error.message),
            ErrorCode::ExternalRateLimited => Self::RateLimited(error.message),
            ErrorCode::ExternalServiceUnavailable => Self::Unavailable(error.message),
            ErrorCode::SerializationError => Self::Malformed(error.message),
            ErrorCode::ExternalTimeout => Self::Timeout(
                error
                    .context
                    .details
                    .get("timeout_secs")
                    .and_then(Value::as_u64)
                    .unwrap_or_default(),
            ),
            _ => Self::Provider(error),
        }
    }
}

/// External text generation backend
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Backend name for logs and the config endpoint
    fn name(&self) -> &str;

    /// Model identifier reported by the config endpoint
    fn model(&self) -> &str;

    /// Produce text for one prompt, single attempt
    async fn generate(
        &self,
        request: &TextGenerationRequest,
    ) -> Result<GeneratedText, ExternalGenerationError>;
}

const SYSTEM_PROMPT: &str =
    "Você é um nutricionista clínico especializado em diabetes. Responda em português do Brasil, em markdown.";

/// [`TextGenerator`] over any chat-completion [`LlmProvider`]
pub struct LlmTextGenerator {
    provider: Arc<dyn LlmProvider>,
    model: Option<String>,
}

impl LlmTextGenerator {
    /// Wrap a provider, using its default model
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            model: None,
        }
    }

    /// Override the model sent with every request
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

#[async_trait]
impl TextGenerator for LlmTextGenerator {
    fn name(&self) -> &str {
        self.provider.name()
    }

    fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    async fn generate(
        &self,
        request: &TextGenerationRequest,
    ) -> Result<GeneratedText, ExternalGenerationError> {
        let capabilities = self.provider.capabilities();
        if request.purpose == GenerationPurpose::FullDocument && !capabilities.supports_long_output() {
            warn!(
                provider = self.provider.name(),
                "provider may truncate full documents"
            );
        }

        let mut messages = Vec::with_capacity(2);
        if capabilities.supports_system_messages() {
            messages.push(ChatMessage::system(SYSTEM_PROMPT));
        }
        messages.push(ChatMessage::user(request.prompt.clone()));
        let mut chat = ChatRequest::new(messages).with_max_tokens(request.max_tokens);
        if let Some(model) = &self.model {
            chat = chat.with_model(model.clone());
        }

        let response = self.provider.complete(&chat).await?;
        let text = response.content.trim().to_owned();
        if text.is_empty() {
            return Err(ExternalGenerationError::Malformed(format!(
                "{} returned empty text for {}",
                self.provider.display_name(),
                request.purpose
            )));
        }

        Ok(GeneratedText {
            text,
            tokens_used: response.usage.map_or(0, |u| u.total_tokens),
        })
    }
}
