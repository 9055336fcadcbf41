//! Deciding when to answer support questions, and answering them.

mod commands;
mod handler;
mod keywords;
mod pipeline;
mod sanitize;
mod scoring;

pub use commands::triage_commands;
pub use handler::handle_message;
pub use keywords::{KeywordEntry, KeywordTable, TriggerPolicy};
pub use pipeline::{
    FAILURE_PREFIX, FALLBACK_PROMPT, FAQ_URL, MAX_SHOWN_DETAIL, TriageContext, TriageOutcome,
    failure_reply, triage_query,
};
pub use sanitize::sanitize;
pub use scoring::{ScoreResult, score};
