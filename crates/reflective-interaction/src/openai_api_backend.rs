//! OpenAIApiBackend - Direct REST API implementation for OpenAI GPT.
//!
//! Calls the OpenAI Chat Completions API with a system and a user message.
//! Configuration priority: ~/.config/reflective/secret.json > environment variables

use async_trait::async_trait;
use reflective_core::config::OpenAIConfig;
use reflective_core::{BackendError, CompletionRequest, TextBackend};
use reqwest::{Client, StatusCode, header::HeaderValue};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
const BASE_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Backend implementation that talks to the OpenAI HTTP API.
#[derive(Clone)]
pub struct OpenAIApiBackend {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAIApiBackend {
    /// Creates a new backend with the provided API key and default model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Builds a backend from the `openai` section of secret.json, falling back
    /// to environment variables.
    ///
    /// Priority:
    /// 1. `secret.openai` from ~/.config/reflective/secret.json
    /// 2. Environment variables (OPENAI_API_KEY, OPENAI_MODEL_NAME)
    ///
    /// Model name defaults to `gpt-4o` if not specified.
    pub fn try_from_secrets(secret: Option<&OpenAIConfig>) -> Result<Self, BackendError> {
        if let Some(config) = secret {
            let model = config
                .model_name
                .clone()
                .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.into());
            let backend = Self::new(config.api_key.clone(), model);
            return Ok(match &config.base_url {
                Some(url) => backend.with_base_url(url.clone()),
                None => backend,
            });
        }

        let api_key = env::var("OPENAI_API_KEY").map_err(|_| {
            BackendError::Config(
                "OPENAI_API_KEY not found in ~/.config/reflective/secret.json or environment variables"
                    .into(),
            )
        })?;

        let model = env::var("OPENAI_MODEL_NAME").unwrap_or_else(|_| DEFAULT_OPENAI_MODEL.into());
        Ok(Self::new(api_key, model))
    }

    /// Points the backend at a compatible chat-completions endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn build_request_body(&self, request: CompletionRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: request.model.unwrap_or_else(|| self.model.clone()),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: request.system_message,
                },
                ChatMessage {
                    role: "user",
                    content: request.user_message,
                },
            ],
            max_tokens: request.max_output_tokens,
            temperature: request.temperature,
        }
    }

    async fn send_request(&self, body: &ChatCompletionRequest) -> Result<String, BackendError> {
        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    BackendError::transport(format!("OpenAI API request timed out: {err}"), true)
                } else {
                    BackendError::transport(
                        format!("OpenAI API request failed: {err}"),
                        err.is_connect(),
                    )
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let retry_after = parse_retry_after(response.headers().get("retry-after"));
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read OpenAI error body".to_string());
            return Err(map_http_error(status, body_text, retry_after));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|err| {
            BackendError::MalformedResponse(format!("Failed to parse OpenAI response: {err}"))
        })?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl TextBackend for OpenAIApiBackend {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, BackendError> {
        let body = self.build_request_body(request);
        tracing::debug!(
            model = %body.model,
            max_tokens = body.max_tokens,
            temperature = body.temperature,
            "[OpenAIApiBackend] Sending chat completion"
        );
        self.send_request(&body).await
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_text_response(response: ChatCompletionResponse) -> Result<String, BackendError> {
    let text = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(BackendError::EmptyResponse);
    }
    Ok(text)
}

fn map_http_error(status: StatusCode, body: String, retry_after: Option<Duration>) -> BackendError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or(body);

    let is_retryable = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    );

    BackendError::Http {
        status_code: status.as_u16(),
        message,
        is_retryable,
        retry_after,
    }
}

fn parse_retry_after(header: Option<&HeaderValue>) -> Option<Duration> {
    let value = header?.to_str().ok()?;
    // HTTP-date form is not supported
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reflective_core::config::GenerationSettings;

    #[test]
    fn test_request_body_uses_override_model() {
        let backend = OpenAIApiBackend::new("sk-test", "gpt-4o");
        let body = backend.build_request_body(
            CompletionRequest::new("You are a twin.", "Rate this")
                .with_temperature(0.0)
                .with_max_output_tokens(50)
                .with_model(Some("gpt-3.5-turbo".into())),
        );

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-3.5-turbo");
        assert_eq!(json["max_tokens"], 50);
        assert_eq!(json["temperature"], 0.0);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "Rate this");
    }

    #[test]
    fn test_request_body_falls_back_to_default_model() {
        let backend = OpenAIApiBackend::new("sk-test", "gpt-4o-mini");
        let body = backend.build_request_body(CompletionRequest::new("s", "u"));
        assert_eq!(body.model, "gpt-4o-mini");
    }

    #[test]
    fn test_extract_trims_and_rejects_empty() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"content": "  Looks clean  \n"}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text_response(response).unwrap(), "Looks clean");

        let empty: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": null}}]}"#).unwrap();
        assert_eq!(extract_text_response(empty), Err(BackendError::EmptyResponse));

        let none: ChatCompletionResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert_eq!(extract_text_response(none), Err(BackendError::EmptyResponse));
    }

    #[test]
    fn test_map_http_error_extracts_message_and_retryability() {
        let err = map_http_error(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"error": {"message": "Rate limit reached", "type": "requests"}}"#.into(),
            Some(Duration::from_secs(3)),
        );
        assert!(err.is_retryable());
        assert_eq!(err.retry_after(), Some(Duration::from_secs(3)));
        assert!(err.to_string().contains("Rate limit reached"));

        let auth = map_http_error(StatusCode::UNAUTHORIZED, "not json".into(), None);
        assert!(!auth.is_retryable());
        assert!(auth.to_string().contains("not json"));
    }

    #[test]
    fn test_parse_retry_after_seconds_only() {
        let seconds = HeaderValue::from_static("7");
        assert_eq!(parse_retry_after(Some(&seconds)), Some(Duration::from_secs(7)));

        let date = HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT");
        assert_eq!(parse_retry_after(Some(&date)), None);
        assert_eq!(parse_retry_after(None), None);
    }

    #[test]
    fn test_secret_config_takes_priority() {
        let config = OpenAIConfig {
            api_key: "sk-file".into(),
            model_name: None,
            base_url: Some("http://localhost:8080/v1/chat/completions".into()),
        };
        let backend = OpenAIApiBackend::try_from_secrets(Some(&config)).unwrap();
        assert_eq!(backend.api_key, "sk-file");
        assert_eq!(backend.model, DEFAULT_OPENAI_MODEL);
        assert_eq!(backend.base_url, "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_secret_model_name_reaches_request_body() {
        let config = OpenAIConfig {
            api_key: "sk-file".into(),
            model_name: Some("gpt-4.1-mini".into()),
            base_url: None,
        };
        let backend = OpenAIApiBackend::try_from_secrets(Some(&config)).unwrap();
        let settings = GenerationSettings::default();

        let body = backend.build_request_body(
            CompletionRequest::new("You are Alex Chen, a persona.", "Review this")
                .with_model(settings.feedback_model.clone()),
        );
        assert_eq!(body.model, "gpt-4.1-mini");

        let body = backend.build_request_body(
            CompletionRequest::new("summary", "feedback").with_model(settings.summary_model.clone()),
        );
        assert_eq!(body.model, "gpt-4.1-mini");
    }
}
