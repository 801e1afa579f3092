//! Feedback domain module.
//!
//! Value types that flow through a feedback run: the material under test,
//! the requested response style, per-persona results and the aggregate view.

mod material;
mod model;
mod run;

pub use material::Material;
pub use model::{
    AggregateSummary, FeedbackResult, NOT_AVAILABLE, ResponseStyle, Sentiment,
    SentimentJudgment, SentimentTally,
};
pub use run::{FeedbackRun, PersonaOutcome, RunReport};
