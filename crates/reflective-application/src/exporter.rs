//! Plain-text export of feedback runs.

use once_cell::sync::Lazy;
use regex::Regex;
use reflective_core::feedback::{FeedbackResult, FeedbackRun};
use reflective_core::persona::{Persona, PersonaCatalog};

/// Filename of the combined export.
pub const COMBINED_FILENAME: &str = "reflective_feedback.txt";

static NON_ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9]").expect("valid regex"));

/// A downloadable text artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub filename: String,
    pub content: Vec<u8>,
}

impl ExportArtifact {
    pub fn mime_type(&self) -> &'static str {
        "text/plain; charset=utf-8"
    }

    /// The content as text. Exports are always UTF-8.
    pub fn as_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }
}

/// Every persona's block in selection order, followed by the trend summary.
pub fn export_all(run: &FeedbackRun, catalog: &PersonaCatalog) -> ExportArtifact {
    let mut blocks: Vec<String> = run
        .ordered_results()
        .map(|(id, result)| {
            let name = catalog
                .get(id)
                .map_or_else(|| id.to_string(), Persona::display_name);
            feedback_block(&name, result)
        })
        .collect();

    blocks.push(format!("Overall Trends:\n{}", run.summary.text()));

    ExportArtifact {
        filename: COMBINED_FILENAME.to_string(),
        content: (blocks.join("\n\n") + "\n").into_bytes(),
    }
}

/// A single persona's block. The filename derives from the display name,
/// which is unique within a catalog.
pub fn export_one(persona: &Persona, result: &FeedbackResult) -> ExportArtifact {
    let name = persona.display_name();
    ExportArtifact {
        filename: persona_filename(&name),
        content: (feedback_block(&name, result) + "\n").into_bytes(),
    }
}

fn feedback_block(name: &str, result: &FeedbackResult) -> String {
    format!(
        "Feedback from {name}:\nSentiment: {}\n{}",
        result.sentiment_label(),
        result.feedback
    )
}

fn persona_filename(name: &str) -> String {
    format!("{}_feedback.txt", NON_ALPHANUMERIC.replace_all(name, "_"))
}
