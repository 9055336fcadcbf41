//! Gateway message handler for automatic support replies.

use log::{debug, error, warn};
use poise::serenity_prelude::{Context, Message as SerenityMessage};

use crate::bot::Data;
use crate::delivery::{ChannelSink, DISCORD_MESSAGE_LIMIT, truncate};
use crate::error::Result;
use crate::generation::FailureKind;
use crate::types::InboundMessage;

use super::pipeline::TriageOutcome;

/// Answer a human message when it scores as a support question.
pub async fn handle_message(
    ctx: &Context,
    new_message: &SerenityMessage,
    data: &Data,
) -> Result<()> {
    let bot_user_id = ctx.cache.current_user().id;
    if new_message.author.bot || new_message.author.id == bot_user_id {
        return Ok(());
    }

    let inbound = InboundMessage::from_discord(new_message, bot_user_id);
    let Some(query) = data.triage().triage(&inbound) else {
        return Ok(());
    };

    if let Err(e) = new_message.channel_id.broadcast_typing(&ctx.http).await {
        debug!("Failed to broadcast typing indicator: {e}");
    }

    let sink =
        ChannelSink::new(ctx.http.clone(), new_message.channel_id).replying_to(new_message.id);
    let outcome = data
        .triage()
        .answer(data.openrouter_client(), &inbound.author_name, &query, &sink)
        .await
        .map_err(|e| {
            error!(
                "Error replying to {} in channel {}: {e}",
                new_message.author.tag(),
                new_message.channel_id
            );
            e
        })?;

    report_to_operator(ctx, data, &outcome).await;
    Ok(())
}

/// Forward credential failures to the operator channel, when configured.
pub(crate) async fn report_to_operator(ctx: &Context, data: &Data, outcome: &TriageOutcome) {
    let TriageOutcome::Failed {
        kind: FailureKind::Authentication,
        detail,
        ..
    } = outcome
    else {
        return;
    };

    let Some(channel) = data.operator_channel() else {
        warn!("Generation backend rejected our credentials: {detail}");
        return;
    };

    let alert = truncate(
        &format!("⚠️ Generation backend authentication failed: {detail}"),
        DISCORD_MESSAGE_LIMIT,
    );
    if let Err(e) = channel.say(&ctx.http, alert).await {
        error!("Failed to alert operator channel {channel}: {e}");
    }
}
