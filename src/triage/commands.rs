//! Poise slash commands for support questions.

use crate::bot::Data;
use crate::delivery::MessageSink;
use crate::error::{BotError, Result};

use super::handler::report_to_operator;
use super::pipeline::{FAQ_URL, TriageOutcome};

/// Context type for support commands.
type Context<'a> = poise::Context<'a, Data, BotError>;

/// Sends each fragment as a reply to the invoking interaction.
struct CommandSink<'a> {
    ctx: Context<'a>,
}

impl MessageSink for CommandSink<'_> {
    async fn send(&self, content: &str) -> Result<()> {
        self.ctx.say(content).await?;
        Ok(())
    }
}

/// Get CSS help for the Chillax theme.
#[poise::command(slash_command)]
pub async fn css(
    ctx: Context<'_>,
    #[description = "What do you want to edit?"] query: String,
) -> Result<()> {
    ctx.defer().await?;

    let data = ctx.data();
    let author = ctx.author();
    let author_name = author.global_name.as_ref().unwrap_or(&author.name);

    let outcome = data
        .triage()
        .answer(
            data.openrouter_client(),
            author_name,
            &query,
            &CommandSink { ctx },
        )
        .await?;

    if matches!(outcome, TriageOutcome::Answered { fragments: 0 }) {
        ctx.say(format!("I came up empty on that one. Check the FAQ: {FAQ_URL}"))
            .await?;
    }
    report_to_operator(ctx.serenity_context(), data, &outcome).await;
    Ok(())
}

/// View the Chillax FAQ link.
#[poise::command(slash_command)]
pub async fn faq(ctx: Context<'_>) -> Result<()> {
    ctx.say(format!("📖 **Official FAQ:** {FAQ_URL}")).await?;
    Ok(())
}

/// Get available support commands.
#[must_use]
pub fn triage_commands() -> Vec<poise::Command<Data, BotError>> {
    vec![css(), faq()]
}
