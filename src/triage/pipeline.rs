//! Sanitize, score, generate, split, deliver.

use log::{debug, info, warn};

use crate::delivery::{DISCORD_MESSAGE_LIMIT, DeliveryMode, MessageSink, deliver, truncate};
use crate::error::Result;
use crate::generation::{
    FailureKind, GenerationBackend, GenerationOutcome, GenerationRequest, generate,
};
use crate::types::InboundMessage;

use super::keywords::KeywordTable;
use super::sanitize::sanitize;
use super::scoring::{ScoreResult, score};

pub const FAQ_URL: &str = "https://chillax.inmoresentum.net/vencordfaq.html";

/// Sent instead of an empty question when someone only pinged the bot.
pub const FALLBACK_PROMPT: &str = "Tell me about the Chillax theme.";

/// Every backend-failure reply starts with this.
pub const FAILURE_PREFIX: &str = "Sorry, I couldn't get an answer right now:";

/// Longest error detail echoed back to users. The full text stays in the log.
pub const MAX_SHOWN_DETAIL: usize = 200;

/// Everything a triage run needs besides the message itself.
#[derive(Debug, Clone)]
pub struct TriageContext {
    pub keywords: KeywordTable,
    pub persona_prompt: String,
    pub delivery_mode: DeliveryMode,
    pub message_limit: usize,
}

impl TriageContext {
    #[must_use]
    pub fn new(
        keywords: KeywordTable,
        persona_prompt: String,
        delivery_mode: DeliveryMode,
    ) -> Self {
        Self {
            keywords,
            persona_prompt,
            delivery_mode,
            message_limit: DISCORD_MESSAGE_LIMIT,
        }
    }
}

/// What happened to one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriageOutcome {
    Answered {
        fragments: usize,
    },
    /// The backend failed and the apology was delivered instead.
    Failed {
        kind: FailureKind,
        detail: String,
        fragments: usize,
    },
}

/// Decide whether `message` deserves a reply and, if so, what to ask.
#[must_use]
pub fn triage_query(
    message: &InboundMessage,
    keywords: &KeywordTable,
) -> (ScoreResult, Option<String>) {
    let cleaned = sanitize(&message.raw_text, &message.self_id.to_string());
    let result = score(&cleaned, message.addressed_to_bot, keywords);
    if !result.triggered {
        return (result, None);
    }
    (result, Some(query_or_fallback(cleaned)))
}

fn query_or_fallback(query: String) -> String {
    if query.trim().is_empty() {
        FALLBACK_PROMPT.to_string()
    } else {
        query
    }
}

/// The user-visible text for a failed generation. Always fits in one
/// Discord message.
#[must_use]
pub fn failure_reply(kind: FailureKind, detail: &str) -> String {
    let shown = match kind {
        FailureKind::Authentication => {
            "my AI service rejected my credentials. Please contact the bot administrator."
                .to_string()
        }
        FailureKind::Unavailable | FailureKind::Backend => {
            truncate(detail.trim(), MAX_SHOWN_DETAIL)
        }
    };
    format!("{FAILURE_PREFIX} {shown}\nIn the meantime, check the FAQ: {FAQ_URL}")
}

impl TriageContext {
    /// Decide whether `message` gets a reply; returns the question to ask.
    #[must_use]
    pub fn triage(&self, message: &InboundMessage) -> Option<String> {
        let (result, query) = triage_query(message, &self.keywords);
        if query.is_some() {
            info!(
                "Answering {} (score {}, addressed {})",
                message.author_name, result.score, message.addressed_to_bot
            );
        } else {
            debug!(
                "Ignoring message from {} (score {})",
                message.author_name, result.score
            );
        }
        query
    }

    /// Ask the backend `query` on behalf of `author_name` and deliver the
    /// reply (or the apology) to `sink`.
    ///
    /// # Errors
    ///
    /// Returns an error only when delivery to `sink` fails after its retry.
    pub async fn answer<B, S>(
        &self,
        backend: &B,
        author_name: &str,
        query: &str,
        sink: &S,
    ) -> Result<TriageOutcome>
    where
        B: GenerationBackend,
        S: MessageSink,
    {
        let request = GenerationRequest {
            persona_prompt: self.persona_prompt.clone(),
            author_name: author_name.to_string(),
            query: query_or_fallback(query.to_string()),
        };

        match generate(backend, &request).await {
            GenerationOutcome::Success(text) => {
                let fragments = self.delivery_mode.fragments(&text, self.message_limit);
                if fragments.is_empty() {
                    warn!("No response content generated");
                }
                let fragments = deliver(sink, &fragments).await?;
                info!("Replied to {author_name} in {fragments} message(s)");
                Ok(TriageOutcome::Answered { fragments })
            }
            GenerationOutcome::Failure { kind, detail } => {
                let reply = failure_reply(kind, &detail);
                let fragments = self.delivery_mode.fragments(&reply, self.message_limit);
                let fragments = deliver(sink, &fragments).await?;
                Ok(TriageOutcome::Failed {
                    kind,
                    detail,
                    fragments,
                })
            }
        }
    }
}
