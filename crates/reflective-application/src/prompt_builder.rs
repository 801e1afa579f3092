//! Prompt Builder
//!
//! Renders a persona plus a response style into the system and user messages
//! sent to the feedback backend. Rendering is a pure function of its inputs:
//! attribute groups are ordered maps and the templates hold no time or random
//! state, so identical inputs always produce byte-identical prompts.

use minijinja::{Environment, context};
use reflective_core::feedback::{Material, ResponseStyle};
use reflective_core::persona::{Persona, PersonaGroup, render_group};
use reflective_core::{DataIntegrityError, ReflectiveError, Result};
use serde::Serialize;

const SYSTEM_TEMPLATE: &str = r#"You are {{ name }}, a {{ age }}-year-old {{ title }} living in {{ location }}.
Education: {{ education }}. Occupation: {{ occupation }}. Income range: {{ income }}.
Personality traits: {{ personality }}.
Your top priorities are: {{ priorities }}.
Your daily routine: {{ daily_routine }}
Your favorite social media channels are: {{ social_media }}.
You prefer to receive information through {{ information_preference }}.
Give honest, realistic feedback in the first person, the way this person would, grounded in your lifestyle, values and preferences."#;

const DETAILED_TEMPLATE: &str = r#"Review the following material from your personal perspective.
Provide exactly 3-4 critical, actionable insights. For each insight, give a concrete suggestion for how it could be improved.
End with a short summary statement of your overall opinion.

Material:
{{ material }}"#;

const SHORT_TEMPLATE: &str = r#"Review the following material from your personal perspective.
Respond with 2-3 concise bullet points. Every point must include concrete specifics, such as named examples, brands or places, that relate to your lifestyle.

Material:
{{ material }}"#;

/// The two messages of one feedback request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prompt {
    pub system_message: String,
    pub user_message: String,
}

/// Holds the compiled prompt templates.
pub struct PromptBuilder {
    env: Environment<'static>,
}

impl PromptBuilder {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        for (name, source) in [
            ("system", SYSTEM_TEMPLATE),
            ("detailed", DETAILED_TEMPLATE),
            ("short", SHORT_TEMPLATE),
        ] {
            env.add_template(name, source).map_err(template_error)?;
        }
        Ok(Self { env })
    }

    /// Builds the prompt for one persona.
    ///
    /// # Errors
    ///
    /// * `ReflectiveError::DataIntegrity` - a field the system message needs is missing
    pub fn build_prompt(
        &self,
        persona: &Persona,
        style: ResponseStyle,
        material: &Material,
    ) -> Result<Prompt> {
        let fields = SystemFields::extract(persona)?;

        let system_message = self
            .env
            .get_template("system")
            .and_then(|template| template.render(&fields))
            .map_err(template_error)?;

        let template_name = match style {
            ResponseStyle::Detailed => "detailed",
            ResponseStyle::Short => "short",
        };
        let user_message = self
            .env
            .get_template(template_name)
            .and_then(|template| template.render(context! { material => material.prompt_text() }))
            .map_err(template_error)?;

        Ok(Prompt {
            system_message,
            user_message,
        })
    }
}

fn template_error(err: minijinja::Error) -> ReflectiveError {
    ReflectiveError::internal(format!("Prompt template error: {err}"))
}

/// Every value the system message encodes, already flattened to text.
#[derive(Serialize)]
struct SystemFields {
    name: String,
    age: u32,
    title: String,
    location: String,
    education: String,
    occupation: String,
    income: String,
    personality: String,
    priorities: String,
    daily_routine: String,
    social_media: String,
    information_preference: String,
}

impl SystemFields {
    fn extract(persona: &Persona) -> std::result::Result<Self, DataIntegrityError> {
        let missing = |field: &str| DataIntegrityError::missing(&persona.id, field);

        let text = |value: &Option<String>, field: &str| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .map(str::to_string)
                .ok_or_else(|| missing(field))
        };

        let joined = |group: PersonaGroup, key: &str| {
            persona
                .attribute(group, key)
                .map(|value| value.items().join(", "))
                .ok_or_else(|| missing(format!("{group}.{key}").as_str()))
        };

        let non_blank = |value: &str, field: &str| {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                Err(missing(field))
            } else {
                Ok(trimmed.to_string())
            }
        };

        if persona.personality_traits.is_empty() {
            return Err(missing(PersonaGroup::PersonalityTraits.as_ref()));
        }

        let information_preference = persona
            .attribute(PersonaGroup::CommunicationStyle, "information_preferences")
            .and_then(|value| value.items().into_iter().next())
            .map(|first| first.trim().to_lowercase())
            .filter(|first| !first.is_empty())
            .ok_or_else(|| missing("communication_style.information_preferences"))?;

        Ok(Self {
            name: non_blank(persona.name.as_str(), "name")?,
            age: persona.age.ok_or_else(|| missing("age"))?,
            title: non_blank(persona.title.as_str(), "title")?,
            location: text(&persona.location, "location")?,
            education: text(&persona.education, "education")?,
            occupation: text(&persona.occupation, "occupation")?,
            income: text(&persona.income, "income")?,
            personality: render_group(&persona.personality_traits),
            priorities: joined(PersonaGroup::ValuesAndBeliefs, "priorities")?,
            daily_routine: persona
                .attribute(PersonaGroup::BehavioralPatterns, "daily_routine")
                .map(|value| value.render())
                .ok_or_else(|| missing("behavioral_patterns.daily_routine"))?,
            social_media: joined(PersonaGroup::TechnologyUsage, "favorite_social_media")?,
            information_preference,
        })
    }
}
