//! Streaming chat-completion client.
//!
//! The relay talks to an OpenAI-compatible `/v1/chat/completions` endpoint
//! with `stream: true` and forwards the response body as decoded text chunks.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::Serialize;
use thiserror::Error;

pub mod decoder;
pub mod openai;

pub use decoder::{decode_utf8_stream, Utf8ChunkDecoder};
pub use openai::OpenAiCompatibleClient;

/// Errors from the completion upstream
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Transport failure before a response arrived
    #[error("Completion request failed: {0}")]
    Request(String),

    /// Upstream answered with a non-2xx status
    #[error("Completion endpoint returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body failed mid-stream
    #[error("Completion stream failed: {0}")]
    Stream(String),

    #[error("Completion configuration error: {0}")]
    Config(String),
}

/// Text chunks of an upstream response, in arrival order
pub type CompletionStream = BoxStream<'static, Result<String, CompletionError>>;

/// One chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// A streaming completion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
}

/// Source of streamed completions
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Open the upstream stream.
    ///
    /// Resolves once the upstream has answered with a success status; body
    /// failures after that surface as stream items.
    async fn stream_completion(&self, request: CompletionRequest) -> Result<CompletionStream, CompletionError>;
}

/// Upstream endpoint settings
#[derive(Clone)]
pub struct CompletionConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub connect_timeout: Duration,
}

impl std::fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_url: "https://apps.abacus.ai/v1/chat/completions".to_string(),
            api_key: None,
            model: "gpt-4.1-mini".to_string(),
            max_tokens: 2000,
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl CompletionConfig {
    /// Load from `AI_API_URL`, `AI_API_KEY` (or `ABACUSAI_API_KEY`), `AI_MODEL`,
    /// `AI_MAX_TOKENS` and `AI_CONNECT_TIMEOUT_SECONDS`
    pub fn from_env() -> Result<Self, CompletionError> {
        let defaults = Self::default();

        let api_key = env::var("AI_API_KEY")
            .or_else(|_| env::var("ABACUSAI_API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty());

        Ok(Self {
            api_url: env::var("AI_API_URL").unwrap_or(defaults.api_url),
            api_key,
            model: env::var("AI_MODEL").unwrap_or(defaults.model),
            max_tokens: parse_env("AI_MAX_TOKENS", defaults.max_tokens)?,
            connect_timeout: Duration::from_secs(parse_env("AI_CONNECT_TIMEOUT_SECONDS", 10u64)?),
        })
    }
}

fn parse_env<T: FromStr>(key: &str, default: T) -> Result<T, CompletionError> {
    match env::var(key) {
        Ok(value) => value
            .parse()
            .map_err(|_| CompletionError::Config(format!("{} must be a number, got {:?}", key, value))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CompletionConfig::default();
        assert_eq!(config.model, "gpt-4.1-mini");
        assert_eq!(config.max_tokens, 2000);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = CompletionConfig {
            api_key: Some("sk-secret".to_string()),
            ..CompletionConfig::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
