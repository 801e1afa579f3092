//! Material under evaluation.

use serde::{Deserialize, Serialize};

const IMAGE_ONLY_SENTENCE: &str = "Please provide feedback on the following image.";
const IMAGE_SUFFIX_SENTENCE: &str = "Please also consider the following image.";

/// Free-text material plus an optional attached image reference.
///
/// The image is never inspected; attaching one only adds a placeholder
/// sentence to the prompt text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Material {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, reference: impl Into<String>) -> Self {
        self.image = Some(reference.into());
        self
    }

    /// True when there is neither usable text nor an attached image.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.image.is_none()
    }

    /// The material as it is embedded in prompts. Text is passed through
    /// verbatim; blank text with an image becomes the image-only sentence.
    pub fn prompt_text(&self) -> String {
        match (self.text.trim().is_empty(), self.image.is_some()) {
            (false, true) => format!("{}\n\n{IMAGE_SUFFIX_SENTENCE}", self.text),
            (true, true) => IMAGE_ONLY_SENTENCE.to_string(),
            _ => self.text.clone(),
        }
    }
}
