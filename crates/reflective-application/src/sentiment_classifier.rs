//! Sentiment Classifier
//!
//! Second backend pass that labels a feedback text Positive, Neutral or
//! Negative with a confidence percentage. The reply must be a bare JSON object
//! with `sentiment` and `confidence`; anything else is a
//! [`ClassificationError`], never a guessed label.

use std::sync::Arc;

use reflective_core::config::GenerationSettings;
use reflective_core::feedback::{Sentiment, SentimentJudgment};
use reflective_core::{ClassificationError, CompletionRequest, TextBackend};
use serde::Deserialize;

pub(crate) const SENTIMENT_SYSTEM_MESSAGE: &str = "You are a sentiment analysis assistant.";

pub struct SentimentClassifier {
    backend: Arc<dyn TextBackend>,
    model: Option<String>,
    max_output_tokens: u32,
    temperature: f32,
}

impl SentimentClassifier {
    pub fn new(backend: Arc<dyn TextBackend>, settings: &GenerationSettings) -> Self {
        Self {
            backend,
            model: settings.sentiment_model.clone(),
            max_output_tokens: settings.sentiment_max_tokens,
            temperature: settings.sentiment_temperature,
        }
    }

    pub async fn classify(&self, feedback: &str) -> Result<SentimentJudgment, ClassificationError> {
        let request = CompletionRequest::new(SENTIMENT_SYSTEM_MESSAGE, sentiment_instruction(feedback))
            .with_max_output_tokens(self.max_output_tokens)
            .with_temperature(self.temperature)
            .with_model(self.model.clone());

        let reply = self.backend.complete(request).await?;
        parse_judgment(&reply)
    }
}

fn sentiment_instruction(feedback: &str) -> String {
    format!(
        "Analyze the sentiment of the following feedback and classify it as exactly one of Positive, Neutral, or Negative. \
Provide a confidence score between 0% and 100%. \
Return only a JSON object like {{\"sentiment\": \"Positive\", \"confidence\": \"85%\"}} with no other text.\n\n\
Feedback:\n{feedback}"
    )
}

#[derive(Deserialize)]
struct RawJudgment {
    sentiment: String,
    confidence: serde_json::Value,
}

/// Parses the classifier reply. A single surrounding code fence is tolerated.
pub(crate) fn parse_judgment(reply: &str) -> Result<SentimentJudgment, ClassificationError> {
    let body = strip_code_fence(reply.trim());
    let malformed = |message: String| ClassificationError::MalformedPayload {
        message,
        raw: reply.to_string(),
    };

    let raw: RawJudgment = serde_json::from_str(body).map_err(|err| malformed(err.to_string()))?;

    let sentiment =
        Sentiment::from_label(&raw.sentiment).ok_or(ClassificationError::UnknownLabel(raw.sentiment))?;

    let confidence = match raw.confidence {
        serde_json::Value::String(label) if !label.trim().is_empty() => label.trim().to_string(),
        serde_json::Value::Number(number) => format!("{number}%"),
        other => return Err(malformed(format!("unusable confidence value: {other}"))),
    };

    Ok(SentimentJudgment {
        sentiment,
        confidence,
    })
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop an optional language tag on the opening line
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}
