//! Trend Summarizer
//!
//! One final backend call that synthesizes all generated feedback of a run.

use std::sync::Arc;

use reflective_core::config::GenerationSettings;
use reflective_core::feedback::AggregateSummary;
use reflective_core::{CompletionRequest, TextBackend};

pub(crate) const SUMMARY_SYSTEM_MESSAGE: &str =
    "You are an expert market research analyst summarizing customer feedback.";

pub struct TrendSummarizer {
    backend: Arc<dyn TextBackend>,
    model: Option<String>,
    max_output_tokens: u32,
    temperature: f32,
}

impl TrendSummarizer {
    pub fn new(backend: Arc<dyn TextBackend>, settings: &GenerationSettings) -> Self {
        Self {
            backend,
            model: settings.summary_model.clone(),
            max_output_tokens: settings.summary_max_tokens,
            temperature: settings.summary_temperature,
        }
    }

    /// Summarizes `feedbacks` in the order given. Never fails: a backend error
    /// becomes [`AggregateSummary::Failed`] and empty input is
    /// [`AggregateSummary::NoFeedback`] without a backend call.
    pub async fn summarize(&self, feedbacks: &[&str]) -> AggregateSummary {
        if feedbacks.is_empty() {
            return AggregateSummary::NoFeedback;
        }

        let request = CompletionRequest::new(SUMMARY_SYSTEM_MESSAGE, summary_instruction(feedbacks))
            .with_max_output_tokens(self.max_output_tokens)
            .with_temperature(self.temperature)
            .with_model(self.model.clone());

        match self.backend.complete(request).await {
            Ok(text) if !text.trim().is_empty() => AggregateSummary::Trends(text.trim().to_string()),
            Ok(_) => AggregateSummary::Failed("the backend returned an empty summary".to_string()),
            Err(err) => {
                tracing::warn!(backend = self.backend.name(), "Trend summary failed: {}", err);
                AggregateSummary::Failed(err.to_string())
            }
        }
    }
}

fn summary_instruction(feedbacks: &[&str]) -> String {
    format!(
        "Summarize the common trends, recurring themes and overall sentiment in the following customer feedback. \
Respond with concise bullet points and do not repeat the same point twice.\n\n\
Feedback:\n{}",
        feedbacks.join("\n\n")
    )
}
