//! Persona domain model.
//!
//! A persona is a synthetic customer profile used to ground generated
//! feedback in a consistent point of view. Personas are loaded once and never
//! mutated.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter};

use super::attribute::{AttributeGroup, AttributeValue};

/// The nine nested attribute groups every persona carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum PersonaGroup {
    PersonalityTraits,
    ValuesAndBeliefs,
    BehavioralPatterns,
    PreferencesAndInterests,
    EmotionalResponses,
    CommunicationStyle,
    ConsumerBehavior,
    TechnologyUsage,
    AdditionalInsights,
}

/// A synthetic customer persona.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Persona {
    /// Unique identifier within the catalog
    pub id: String,
    /// Archetype label, unique within the catalog (e.g. "Frequent Traveler")
    pub title: String,
    /// Given name of the persona
    pub name: String,

    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub marital_status: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub occupation: Option<String>,
    /// Income range label (e.g. "$60,000 - $80,000")
    #[serde(default)]
    pub income: Option<String>,
    #[serde(default)]
    pub ethnicity: Option<String>,
    #[serde(default)]
    pub religion: Option<String>,
    /// Reference to a portrait image, not interpreted by the pipeline
    #[serde(default)]
    pub image: Option<String>,

    #[serde(default)]
    pub personality_traits: AttributeGroup,
    #[serde(default)]
    pub values_and_beliefs: AttributeGroup,
    #[serde(default)]
    pub behavioral_patterns: AttributeGroup,
    #[serde(default)]
    pub preferences_and_interests: AttributeGroup,
    #[serde(default)]
    pub emotional_responses: AttributeGroup,
    #[serde(default)]
    pub communication_style: AttributeGroup,
    #[serde(default)]
    pub consumer_behavior: AttributeGroup,
    #[serde(default)]
    pub technology_usage: AttributeGroup,
    #[serde(default)]
    pub additional_insights: AttributeGroup,
}

impl Persona {
    /// Name shown in rendered output and used for export filenames.
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.name, self.title)
    }

    pub fn group(&self, group: PersonaGroup) -> &AttributeGroup {
        match group {
            PersonaGroup::PersonalityTraits => &self.personality_traits,
            PersonaGroup::ValuesAndBeliefs => &self.values_and_beliefs,
            PersonaGroup::BehavioralPatterns => &self.behavioral_patterns,
            PersonaGroup::PreferencesAndInterests => &self.preferences_and_interests,
            PersonaGroup::EmotionalResponses => &self.emotional_responses,
            PersonaGroup::CommunicationStyle => &self.communication_style,
            PersonaGroup::ConsumerBehavior => &self.consumer_behavior,
            PersonaGroup::TechnologyUsage => &self.technology_usage,
            PersonaGroup::AdditionalInsights => &self.additional_insights,
        }
    }

    /// Looks up a sub-attribute, treating blank values as absent.
    pub fn attribute(&self, group: PersonaGroup, key: &str) -> Option<&AttributeValue> {
        self.group(group).get(key).filter(|value| !value.is_blank())
    }
}
