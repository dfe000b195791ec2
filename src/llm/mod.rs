// ABOUTME: LLM provider abstraction used by the external text generator
// ABOUTME: Defines the provider contract plus chat message, request and response types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # LLM Provider Interface
//!
//! The contract a language-model backend implements so the generation router
//! can ask it for plan narratives. Two backends ship with the server:
//!
//! - **`AnthropicProvider`**: Anthropic Messages API (default)
//! - **`OpenAiCompatibleProvider`**: any endpoint speaking the `OpenAI` chat completions API
//!
//! ## Example
//!
//! ```rust,no_run
//! use nutriplan_server::llm::{AnthropicProvider, ChatMessage, ChatRequest, LlmProvider};
//! use nutriplan_server::errors::AppError;
//!
//! async fn example() -> Result<(), AppError> {
//!     let provider = AnthropicProvider::from_env()?;
//!     let request = ChatRequest::new(vec![ChatMessage::user("Olá")]).with_max_tokens(100);
//!     let response = provider.complete(&request).await?;
//!     println!("{}", response.content);
//!     Ok(())
//! }
//! ```

mod anthropic;
mod openai_compatible;

pub use anthropic::{AnthropicConfig, AnthropicProvider, DEFAULT_MODEL as ANTHROPIC_DEFAULT_MODEL};
pub use openai_compatible::{
    OpenAiCompatibleConfig, OpenAiCompatibleProvider,
    DEFAULT_BASE_URL as OPENAI_COMPATIBLE_DEFAULT_BASE_URL,
    DEFAULT_MODEL as OPENAI_COMPATIBLE_DEFAULT_MODEL,
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

// ============================================================================
// Capability Flags
// ============================================================================

bitflags::bitflags! {
    /// Features a provider supports
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct LlmCapabilities: u8 {
        /// Provider accepts a system prompt
        const SYSTEM_MESSAGES = 0b0000_0010;
        /// Provider handles long markdown outputs (several thousand tokens)
        const LONG_OUTPUT = 0b0000_0100;
    }
}

impl LlmCapabilities {
    /// Check if system messages are supported
    #[must_use]
    pub const fn supports_system_messages(&self) -> bool {
        self.contains(Self::SYSTEM_MESSAGES)
    }

    /// Check if long outputs are supported
    #[must_use]
    pub const fn supports_long_output(&self) -> bool {
        self.contains(Self::LONG_OUTPUT)
    }
}

// ============================================================================
// Message Types
// ============================================================================

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instruction message
    System,
    /// User input message
    User,
    /// Assistant response message
    Assistant,
}

impl MessageRole {
    /// Convert to string representation for API calls
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A single message in a chat conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender
    pub role: MessageRole,
    /// Content of the message
    pub content: String,
}

impl ChatMessage {
    /// Create a new chat message
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Create a user message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Configuration for a chat completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Conversation messages
    pub messages: Vec<ChatMessage>,
    /// Model identifier (provider-specific)
    pub model: Option<String>,
    /// Temperature for response randomness
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// Create a new chat request with messages
    #[must_use]
    pub const fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            model: None,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Set the model to use
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the temperature
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum tokens
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Split off system messages, joined by blank lines
    ///
    /// Used by providers whose API takes the system prompt out of band.
    #[must_use]
    pub fn system_prompt(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .messages
            .iter()
            .filter(|m| m.role == MessageRole::System)
            .map(|m| m.content.as_str())
            .collect();
        (!parts.is_empty()).then(|| parts.join("\n\n"))
    }
}

/// Response from a chat completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Generated message content
    pub content: String,
    /// Model used for generation
    pub model: String,
    /// Token usage statistics
    pub usage: Option<TokenUsage>,
    /// Finish reason (`end_turn`, `max_tokens`, `stop`, ...)
    pub finish_reason: Option<String>,
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: u32,
    /// Number of tokens in the completion
    pub completion_tokens: u32,
    /// Total tokens used
    pub total_tokens: u32,
}

impl TokenUsage {
    /// Build from input/output counts
    #[must_use]
    pub const fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
        }
    }
}

// ============================================================================
// Provider Trait
// ============================================================================

/// LLM provider trait for chat completion
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Unique provider identifier (e.g., "anthropic", "ollama")
    fn name(&self) -> &'static str;

    /// Human-readable display name for the provider
    fn display_name(&self) -> &'static str;

    /// Provider capabilities
    fn capabilities(&self) -> LlmCapabilities;

    /// Default model to use if not specified in request
    fn default_model(&self) -> &str;

    /// Perform a chat completion
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError>;

    /// Check if the provider is reachable and the credentials are valid
    async fn health_check(&self) -> Result<bool, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_joins_system_messages() {
        let request = ChatRequest::new(vec![
            ChatMessage::system("a"),
            ChatMessage::user("hello"),
            ChatMessage::system("b"),
        ]);
        assert_eq!(request.system_prompt().as_deref(), Some("a\n\nb"));

        let bare = ChatRequest::new(vec![ChatMessage::user("hello")]);
        assert!(bare.system_prompt().is_none());
    }

    #[test]
    fn test_token_usage_total() {
        let usage = TokenUsage::new(120, 380);
        assert_eq!(usage.total_tokens, 500);
    }
}
