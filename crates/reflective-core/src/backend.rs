//! Text-generation backend contract.
//!
//! Feedback generation, sentiment classification and trend summarization all
//! go through [`TextBackend`]. Concrete transports live in
//! `reflective-interaction`; tests plug in stubs.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One request/response exchange with the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub system_message: String,
    pub user_message: String,
    /// Upper bound on generated tokens
    pub max_output_tokens: u32,
    pub temperature: f32,
    /// Model override; the backend default is used when `None`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl CompletionRequest {
    pub fn new(system_message: impl Into<String>, user_message: impl Into<String>) -> Self {
        Self {
            system_message: system_message.into(),
            user_message: user_message.into(),
            max_output_tokens: 400,
            temperature: 0.7,
            model: None,
        }
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }
}

/// A failed backend exchange.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    /// Network-level failure before a status was received
    #[error("Backend request failed: {message}")]
    Transport { message: String, is_retryable: bool },

    #[error("Backend request timed out after {0:?}")]
    Timeout(Duration),

    /// Non-success HTTP status (auth, quota, server errors)
    #[error("Backend returned HTTP {status_code}: {message}")]
    Http {
        status_code: u16,
        message: String,
        is_retryable: bool,
        retry_after: Option<Duration>,
    },

    #[error("Backend returned an empty response")]
    EmptyResponse,

    #[error("Malformed backend response: {0}")]
    MalformedResponse(String),

    #[error("Backend configuration error: {0}")]
    Config(String),
}

impl BackendError {
    pub fn transport(message: impl Into<String>, is_retryable: bool) -> Self {
        Self::Transport {
            message: message.into(),
            is_retryable,
        }
    }

    /// Whether a fresh attempt has a reasonable chance of succeeding.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { is_retryable, .. } | Self::Http { is_retryable, .. } => {
                *is_retryable
            }
            Self::Timeout(_) => true,
            Self::EmptyResponse | Self::MalformedResponse(_) | Self::Config(_) => false,
        }
    }

    /// Server-requested delay before the next attempt, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Http { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

/// Opaque remote text-generation capability.
#[async_trait]
pub trait TextBackend: Send + Sync {
    /// Short label used in logs
    fn name(&self) -> &str;

    async fn complete(&self, request: CompletionRequest) -> Result<String, BackendError>;
}

#[async_trait]
impl<T: TextBackend + ?Sized> TextBackend for std::sync::Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, BackendError> {
        (**self).complete(request).await
    }
}
