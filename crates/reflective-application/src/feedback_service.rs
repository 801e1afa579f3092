//! Feedback Service
//!
//! Orchestrates one feedback run: validation, a bounded fan-out of
//! generate+classify tasks over the selected personas, the sentiment tally and
//! the closing trend summary.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use futures::{StreamExt, stream};
use reflective_core::config::GenerationSettings;
use reflective_core::feedback::{
    AggregateSummary, FeedbackResult, FeedbackRun, Material, ResponseStyle, SentimentTally,
};
use reflective_core::persona::{Persona, PersonaCatalog};
use reflective_core::{ReflectiveError, Result, TextBackend, ValidationError};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use crate::feedback_generator::FeedbackGenerator;
use crate::prompt_builder::PromptBuilder;
use crate::sentiment_classifier::SentimentClassifier;
use crate::trend_summarizer::TrendSummarizer;

/// Runs the persona-feedback pipeline against a fixed catalog and backend.
pub struct FeedbackService {
    catalog: Arc<PersonaCatalog>,
    prompts: PromptBuilder,
    generator: FeedbackGenerator,
    classifier: SentimentClassifier,
    summarizer: TrendSummarizer,
    concurrency: usize,
}

impl FeedbackService {
    pub fn new(
        catalog: Arc<PersonaCatalog>,
        backend: Arc<dyn TextBackend>,
        settings: &GenerationSettings,
    ) -> Result<Self> {
        Ok(Self {
            catalog,
            prompts: PromptBuilder::new()?,
            generator: FeedbackGenerator::new(backend.clone(), settings),
            classifier: SentimentClassifier::new(backend.clone(), settings),
            summarizer: TrendSummarizer::new(backend, settings),
            concurrency: settings.effective_concurrency(),
        })
    }

    pub fn catalog(&self) -> &PersonaCatalog {
        &self.catalog
    }

    pub async fn run(
        &self,
        selection: &[String],
        material: &Material,
        style: ResponseStyle,
    ) -> Result<FeedbackRun> {
        self.run_with_cancel(selection, material, style, &CancellationToken::new())
            .await
    }

    /// Like [`run`](Self::run), aborting with [`ReflectiveError::Cancelled`]
    /// once `cancel` fires. In-flight requests are dropped and no partial
    /// run is returned.
    ///
    /// # Errors
    ///
    /// * `ReflectiveError::Validation` - empty selection, empty material, or an unknown or repeated persona id
    /// * `ReflectiveError::Cancelled` - the token fired before the run finished
    pub async fn run_with_cancel(
        &self,
        selection: &[String],
        material: &Material,
        style: ResponseStyle,
        cancel: &CancellationToken,
    ) -> Result<FeedbackRun> {
        let personas = self.validate(selection, material)?;

        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("feedback_run", %run_id);

        async move {
            tracing::info!(
                personas = personas.len(),
                %style,
                concurrency = self.concurrency,
                "Starting feedback run"
            );
            let started_at = Utc::now();

            let pipeline = async {
                let results: HashMap<String, FeedbackResult> = stream::iter(personas)
                    .map(|persona| async move {
                        let result = self.process_persona(persona, material, style).await;
                        (persona.id.clone(), result)
                    })
                    .buffered(self.concurrency)
                    .collect()
                    .await;

                let mut run = FeedbackRun {
                    run_id,
                    started_at,
                    style,
                    material: material.clone(),
                    selection: selection.to_vec(),
                    tally: SentimentTally::from_results(results.values()),
                    results,
                    summary: AggregateSummary::NoFeedback,
                };

                let summary = {
                    let generated: Vec<&str> = run.generated_feedback().collect();
                    self.summarizer.summarize(&generated).await
                };
                run.summary = summary;
                run
            };

            let run = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!("Feedback run cancelled");
                    return Err(ReflectiveError::Cancelled);
                }
                finished = pipeline => finished,
            };

            tracing::info!(
                positive = run.tally.positive,
                neutral = run.tally.neutral,
                negative = run.tally.negative,
                summary_generated = run.summary.is_generated(),
                "Feedback run finished"
            );

            Ok(run)
        }
        .instrument(span)
        .await
    }

    fn validate(&self, selection: &[String], material: &Material) -> Result<Vec<&Persona>> {
        if selection.is_empty() {
            return Err(ValidationError::NoPersonasSelected.into());
        }
        if material.is_empty() {
            return Err(ValidationError::EmptyMaterial.into());
        }
        Ok(self.catalog.resolve(selection)?)
    }

    /// Never fails: every error is folded into the persona's result.
    async fn process_persona(
        &self,
        persona: &Persona,
        material: &Material,
        style: ResponseStyle,
    ) -> FeedbackResult {
        let prompt = match self.prompts.build_prompt(persona, style, material) {
            Ok(prompt) => prompt,
            Err(err) => {
                tracing::warn!(persona = %persona.id, "Skipping persona: {}", err);
                return FeedbackResult::failed(format!("An error occurred: {err}"));
            }
        };

        tracing::debug!(persona = %persona.id, "Requesting feedback");
        let feedback = match self.generator.generate(&prompt).await {
            Ok(feedback) => feedback,
            Err(err) => {
                tracing::warn!(persona = %persona.id, "Feedback generation failed: {}", err);
                return FeedbackResult::failed(format!("An error occurred: {err}"));
            }
        };

        tracing::debug!(persona = %persona.id, "Classifying sentiment");
        match self.classifier.classify(&feedback).await {
            Ok(judgment) => FeedbackResult::classified(feedback, judgment),
            Err(err) => {
                tracing::warn!(persona = %persona.id, "Sentiment classification failed: {}", err);
                FeedbackResult::unclassified(feedback)
            }
        }
    }
}
