//! Configuration models.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root of `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct ReflectiveConfig {
    #[serde(default)]
    pub generation: GenerationSettings,
    /// Persona catalog file; the built-in presets are used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,
}

/// Tunables for the three backend calls a run issues.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GenerationSettings {
    /// Unset stage models fall back to the backend's model (`openai.model_name`
    /// or `OPENAI_MODEL_NAME`)
    pub feedback_model: Option<String>,
    pub feedback_max_tokens: u32,
    pub feedback_temperature: f32,
    pub sentiment_model: Option<String>,
    pub sentiment_max_tokens: u32,
    pub sentiment_temperature: f32,
    pub summary_model: Option<String>,
    pub summary_max_tokens: u32,
    pub summary_temperature: f32,
    /// Personas processed at the same time; 1 keeps the sequential behavior
    pub concurrency: usize,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            feedback_model: None,
            feedback_max_tokens: 400,
            feedback_temperature: 0.7,
            sentiment_model: Some("gpt-3.5-turbo".to_string()),
            sentiment_max_tokens: 50,
            sentiment_temperature: 0.0,
            summary_model: None,
            summary_max_tokens: 500,
            summary_temperature: 0.5,
            concurrency: 1,
            request_timeout_secs: 60,
            max_retries: 2,
            retry_base_delay_ms: 500,
        }
    }
}

impl GenerationSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    /// Worker pool size, never below one.
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.max(1)
    }
}

/// Root of `secret.json`.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct SecretConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai: Option<OpenAIConfig>,
}

/// OpenAI API configuration
#[derive(Deserialize, Serialize, Clone)]
pub struct OpenAIConfig {
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    /// Alternative chat-completions endpoint (proxies, compatible servers)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl std::fmt::Debug for OpenAIConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIConfig")
            .field("api_key", &"<redacted>")
            .field("model_name", &self.model_name)
            .field("base_url", &self.base_url)
            .finish()
    }
}
