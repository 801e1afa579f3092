//! Feedback Generator
//!
//! Issues the persona-grounded generation request. Does not retry; wrap the
//! backend in `RetryingBackend` for that.

use std::sync::Arc;

use reflective_core::config::GenerationSettings;
use reflective_core::{BackendError, CompletionRequest, TextBackend};

use crate::prompt_builder::Prompt;

pub struct FeedbackGenerator {
    backend: Arc<dyn TextBackend>,
    model: Option<String>,
    max_output_tokens: u32,
    temperature: f32,
}

impl FeedbackGenerator {
    pub fn new(backend: Arc<dyn TextBackend>, settings: &GenerationSettings) -> Self {
        Self {
            backend,
            model: settings.feedback_model.clone(),
            max_output_tokens: settings.feedback_max_tokens,
            temperature: settings.feedback_temperature,
        }
    }

    /// Returns the trimmed feedback text.
    ///
    /// # Errors
    ///
    /// * `BackendError::EmptyResponse` - the backend answered with blank text
    /// * any transport or HTTP error reported by the backend
    pub async fn generate(&self, prompt: &Prompt) -> Result<String, BackendError> {
        let request = CompletionRequest::new(&prompt.system_message, &prompt.user_message)
            .with_max_output_tokens(self.max_output_tokens)
            .with_temperature(self.temperature)
            .with_model(self.model.clone());

        let feedback = self.backend.complete(request).await?;
        let feedback = feedback.trim();
        if feedback.is_empty() {
            return Err(BackendError::EmptyResponse);
        }
        Ok(feedback.to_string())
    }
}
