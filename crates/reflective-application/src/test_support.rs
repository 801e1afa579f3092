//! Shared fixtures and a scripted backend for unit tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reflective_core::config::GenerationSettings;
use reflective_core::persona::{Persona, PersonaCatalog, get_default_presets};
use reflective_core::{BackendError, CompletionRequest, TextBackend};
use tokio::sync::Mutex;

use crate::sentiment_classifier::SENTIMENT_SYSTEM_MESSAGE;
use crate::trend_summarizer::SUMMARY_SYSTEM_MESSAGE;

pub(crate) fn preset(id: &str) -> Persona {
    get_default_presets()
        .unwrap()
        .into_iter()
        .find(|persona| persona.id == id)
        .unwrap_or_else(|| panic!("no preset {id}"))
}

pub(crate) fn preset_catalog() -> Arc<PersonaCatalog> {
    Arc::new(PersonaCatalog::from_personas(get_default_presets().unwrap()).unwrap())
}

pub(crate) fn persona_fixture() -> Persona {
    serde_json::from_value(serde_json::json!({
        "id": "weekend-gamer",
        "title": "Weekend Gamer",
        "name": "Jordan",
        "age": 24,
        "location": "Seattle, Washington",
        "education": "Some college",
        "occupation": "Barista",
        "income": "$30,000 - $40,000",
        "personality_traits": {"openness": "High", "extraversion": 4},
        "values_and_beliefs": {"priorities": ["Fun", "Friends"]},
        "behavioral_patterns": {"daily_routine": "Early shifts, late-night raids"},
        "technology_usage": {"favorite_social_media": ["Twitch", "Discord"]},
        "communication_style": {"information_preferences": ["YouTube reviews", "Friends"]}
    }))
    .unwrap()
}

pub(crate) fn test_settings(concurrency: usize) -> GenerationSettings {
    GenerationSettings {
        concurrency,
        ..GenerationSettings::default()
    }
}

/// Which of the three pipeline calls a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CallKind {
    Feedback,
    Sentiment,
    Summary,
}

pub(crate) fn call_kind(request: &CompletionRequest) -> CallKind {
    if request.system_message == SENTIMENT_SYSTEM_MESSAGE {
        CallKind::Sentiment
    } else if request.system_message == SUMMARY_SYSTEM_MESSAGE {
        CallKind::Summary
    } else {
        CallKind::Feedback
    }
}

/// Persona name from a feedback system message ("You are <name>, ...").
fn persona_name(request: &CompletionRequest) -> Option<String> {
    request
        .system_message
        .strip_prefix("You are ")
        .and_then(|rest| rest.split(',').next())
        .map(str::to_string)
}

/// Answers each pipeline call from a script and records every request.
pub(crate) struct ScriptedBackend {
    calls: Mutex<Vec<CompletionRequest>>,
    feedback: String,
    sentiment: String,
    summary: Result<String, BackendError>,
    feedback_by_persona: HashMap<String, String>,
    sentiment_by_feedback: HashMap<String, String>,
    failing_personas: HashMap<String, BackendError>,
    latency_by_persona: HashMap<String, Duration>,
}

impl ScriptedBackend {
    pub(crate) fn new(feedback: &str, sentiment: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            feedback: feedback.to_string(),
            sentiment: sentiment.to_string(),
            summary: Ok("- Pricing clarity is the shared concern".to_string()),
            feedback_by_persona: HashMap::new(),
            sentiment_by_feedback: HashMap::new(),
            failing_personas: HashMap::new(),
            latency_by_persona: HashMap::new(),
        }
    }

    pub(crate) fn with_summary(mut self, summary: Result<String, BackendError>) -> Self {
        self.summary = summary;
        self
    }

    pub(crate) fn with_feedback_for(mut self, persona_name: &str, feedback: &str) -> Self {
        self.feedback_by_persona
            .insert(persona_name.to_string(), feedback.to_string());
        self
    }

    pub(crate) fn with_sentiment_for(mut self, feedback: &str, reply: &str) -> Self {
        self.sentiment_by_feedback
            .insert(feedback.to_string(), reply.to_string());
        self
    }

    pub(crate) fn failing_for(mut self, persona_name: &str, error: BackendError) -> Self {
        self.failing_personas.insert(persona_name.to_string(), error);
        self
    }

    pub(crate) fn with_latency_for(mut self, persona_name: &str, latency: Duration) -> Self {
        self.latency_by_persona
            .insert(persona_name.to_string(), latency);
        self
    }

    pub(crate) async fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().await.clone()
    }

    pub(crate) async fn calls_of(&self, kind: CallKind) -> Vec<CompletionRequest> {
        self.calls()
            .await
            .into_iter()
            .filter(|request| call_kind(request) == kind)
            .collect()
    }
}

#[async_trait]
impl TextBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, BackendError> {
        self.calls.lock().await.push(request.clone());

        match call_kind(&request) {
            CallKind::Sentiment => {
                let reply = self
                    .sentiment_by_feedback
                    .iter()
                    .find(|(feedback, _)| request.user_message.contains(feedback.as_str()))
                    .map(|(_, reply)| reply.clone())
                    .unwrap_or_else(|| self.sentiment.clone());
                Ok(reply)
            }
            CallKind::Summary => self.summary.clone(),
            CallKind::Feedback => {
                let name = persona_name(&request).unwrap_or_default();
                if let Some(latency) = self.latency_by_persona.get(&name) {
                    tokio::time::sleep(*latency).await;
                }
                if let Some(error) = self.failing_personas.get(&name) {
                    return Err(error.clone());
                }
                Ok(self
                    .feedback_by_persona
                    .get(&name)
                    .cloned()
                    .unwrap_or_else(|| self.feedback.clone()))
            }
        }
    }
}
