//! Common types used throughout the chillax bot.

use poise::serenity_prelude::{Message as SerenityMessage, UserId};
use serde::Serialize;

/// Role of a message in the conversation.
///
/// Maps to `OpenRouter` API message roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message from the human user
    User,
    /// System prompt or instructions
    System,
}

/// A human message as seen by the triage pipeline.
///
/// Built once per gateway event and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub author_id: UserId,
    pub author_name: String,
    pub raw_text: String,
    pub addressed_to_bot: bool,
    pub self_id: UserId,
}

impl InboundMessage {
    /// Capture the parts of a Discord message the pipeline needs.
    #[must_use]
    pub fn from_discord(message: &SerenityMessage, self_id: UserId) -> Self {
        let author = &message.author;
        Self {
            author_id: author.id,
            author_name: author.global_name.as_ref().unwrap_or(&author.name).clone(),
            raw_text: message.content.clone(),
            addressed_to_bot: message.mentions_user_id(self_id),
            self_id,
        }
    }
}
