//! Application layer for Reflective.
//!
//! The persona-feedback pipeline: prompt construction, feedback generation,
//! sentiment classification, cross-persona aggregation and export.

pub mod exporter;
pub mod feedback_generator;
pub mod feedback_service;
pub mod prompt_builder;
pub mod sentiment_classifier;
pub mod trend_summarizer;

#[cfg(test)]
mod test_support;

pub use exporter::{ExportArtifact, export_all, export_one};
pub use feedback_generator::FeedbackGenerator;
pub use feedback_service::FeedbackService;
pub use prompt_builder::{Prompt, PromptBuilder};
pub use sentiment_classifier::SentimentClassifier;
pub use trend_summarizer::TrendSummarizer;
