//! Per-persona outcomes and their aggregates.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Confidence label recorded when no judgment is available.
pub const NOT_AVAILABLE: &str = "N/A";

/// Requested feedback length and format.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ResponseStyle {
    /// Two to three concrete bullet points
    #[default]
    Short,
    /// Three to four critical insights with suggestions and a closing opinion
    Detailed,
}

/// Sentiment outcome of one persona's feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
    /// No judgment could be obtained
    Error,
}

impl Sentiment {
    /// Parses a classifier label. Only the three definitive classes are accepted.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "positive" => Some(Sentiment::Positive),
            "neutral" => Some(Sentiment::Neutral),
            "negative" => Some(Sentiment::Negative),
            _ => None,
        }
    }

    pub fn is_definitive(self) -> bool {
        !matches!(self, Sentiment::Error)
    }
}

/// A parsed classifier reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentJudgment {
    pub sentiment: Sentiment,
    /// The classifier's literal confidence label, e.g. `"85%"`
    pub confidence: String,
}

/// Outcome of one persona within a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackResult {
    /// Generated feedback, or the error description when generation failed
    pub feedback: String,
    pub sentiment: Sentiment,
    pub confidence: String,
    /// Whether `feedback` holds generated text rather than an error message
    #[serde(default)]
    pub generated: bool,
}

impl FeedbackResult {
    pub fn classified(feedback: impl Into<String>, judgment: SentimentJudgment) -> Self {
        Self {
            feedback: feedback.into(),
            sentiment: judgment.sentiment,
            confidence: judgment.confidence,
            generated: true,
        }
    }

    /// Generated feedback whose sentiment could not be determined.
    pub fn unclassified(feedback: impl Into<String>) -> Self {
        Self {
            feedback: feedback.into(),
            sentiment: Sentiment::Error,
            confidence: NOT_AVAILABLE.to_string(),
            generated: true,
        }
    }

    /// No feedback was produced; `message` describes why.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            feedback: message.into(),
            sentiment: Sentiment::Error,
            confidence: NOT_AVAILABLE.to_string(),
            generated: false,
        }
    }

    /// `"<sentiment> (<confidence>)"`
    pub fn sentiment_label(&self) -> String {
        format!("{} ({})", self.sentiment, self.confidence)
    }
}

/// Count of definitive sentiments in a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentTally {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentTally {
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a FeedbackResult>) -> Self {
        let mut tally = Self::default();
        for result in results {
            tally.record(result.sentiment);
        }
        tally
    }

    /// Error sentiments are ignored.
    pub fn record(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Neutral => self.neutral += 1,
            Sentiment::Negative => self.negative += 1,
            Sentiment::Error => {}
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }

    pub fn count(&self, sentiment: Sentiment) -> usize {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Neutral => self.neutral,
            Sentiment::Negative => self.negative,
            Sentiment::Error => 0,
        }
    }
}

/// Cross-persona trend synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum AggregateSummary {
    Trends(String),
    /// The summary request failed; holds the error description
    Failed(String),
    /// No persona produced feedback, so nothing was summarized
    NoFeedback,
}

impl AggregateSummary {
    pub fn text(&self) -> String {
        match self {
            AggregateSummary::Trends(text) => text.clone(),
            AggregateSummary::Failed(message) => {
                format!("Unable to generate overall trends: {message}")
            }
            AggregateSummary::NoFeedback => "No feedback was available to summarize.".to_string(),
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, AggregateSummary::Trends(_))
    }
}
