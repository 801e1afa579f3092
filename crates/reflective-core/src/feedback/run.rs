//! The per-run context object.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::material::Material;
use super::model::{AggregateSummary, FeedbackResult, ResponseStyle, SentimentTally};

/// Everything a single feedback run produced.
///
/// Results are keyed by persona id; `selection` preserves the order in which
/// the caller picked personas and drives every rendered or exported view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRun {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub style: ResponseStyle,
    pub material: Material,
    pub selection: Vec<String>,
    pub results: HashMap<String, FeedbackResult>,
    pub tally: SentimentTally,
    pub summary: AggregateSummary,
}

impl FeedbackRun {
    pub fn result(&self, persona_id: &str) -> Option<&FeedbackResult> {
        self.results.get(persona_id)
    }

    /// Results in selection order.
    pub fn ordered_results(&self) -> impl Iterator<Item = (&str, &FeedbackResult)> {
        self.selection.iter().filter_map(|id| {
            self.results
                .get(id)
                .map(|result| (id.as_str(), result))
        })
    }

    /// The run as it is rendered to JSON, with results listed in selection order.
    pub fn report(&self) -> RunReport<'_> {
        RunReport {
            run_id: self.run_id,
            started_at: self.started_at,
            style: self.style,
            material: &self.material,
            results: self
                .ordered_results()
                .map(|(persona_id, result)| PersonaOutcome { persona_id, result })
                .collect(),
            tally: self.tally,
            summary: &self.summary,
        }
    }

    /// Generated feedback texts in selection order, error results excluded.
    pub fn generated_feedback(&self) -> impl Iterator<Item = &str> {
        self.ordered_results()
            .filter(|(_, result)| result.generated)
            .map(|(_, result)| result.feedback.as_str())
    }
}

/// Serializable, selection-ordered view of a [`FeedbackRun`].
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub style: ResponseStyle,
    pub material: &'a Material,
    pub results: Vec<PersonaOutcome<'a>>,
    pub tally: SentimentTally,
    pub summary: &'a AggregateSummary,
}

#[derive(Debug, Serialize)]
pub struct PersonaOutcome<'a> {
    pub persona_id: &'a str,
    #[serde(flatten)]
    pub result: &'a FeedbackResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staggered_run() -> FeedbackRun {
        let mut results = HashMap::new();
        results.insert("p1".to_string(), FeedbackResult::unclassified("one"));
        results.insert("p2".to_string(), FeedbackResult::failed("boom"));
        results.insert("p3".to_string(), FeedbackResult::unclassified("three"));

        FeedbackRun {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            style: ResponseStyle::Short,
            material: Material::new("Poster"),
            selection: vec!["p3".into(), "p1".into(), "p2".into()],
            tally: SentimentTally::default(),
            summary: AggregateSummary::NoFeedback,
            results,
        }
    }

    #[test]
    fn test_ordered_results_follow_selection() {
        let run = staggered_run();

        let ids: Vec<&str> = run.ordered_results().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["p3", "p1", "p2"]);

        let generated: Vec<&str> = run.generated_feedback().collect();
        assert_eq!(generated, vec!["three", "one"]);
    }

    #[test]
    fn test_report_lists_results_in_selection_order() {
        let json = serde_json::to_value(staggered_run().report()).unwrap();

        let ids: Vec<&str> = json["results"]
            .as_array()
            .unwrap()
            .iter()
            .map(|entry| entry["persona_id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["p3", "p1", "p2"]);
        assert_eq!(json["results"][2]["feedback"], "boom");
        assert_eq!(json["results"][2]["sentiment"], "Error");
        assert_eq!(json["summary"]["status"], "no_feedback");
    }
}
