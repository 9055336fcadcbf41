//! Poise slash command for paced mentions.

use poise::CreateReply;
use poise::serenity_prelude::{Mentionable, Permissions, User};

use crate::bot::Data;
use crate::delivery::ChannelSink;
use crate::error::{BotError, Result};

/// Context type for broadcast commands.
type Context<'a> = poise::Context<'a, Data, BotError>;

/// Resolved permissions of the invoking member, empty outside a guild.
fn invoker_permissions(ctx: Context<'_>) -> Permissions {
    if let poise::Context::Application(app_ctx) = ctx {
        app_ctx
            .interaction
            .member
            .as_ref()
            .and_then(|member| member.permissions)
            .unwrap_or_else(Permissions::empty)
    } else {
        Permissions::empty()
    }
}

async fn reply_ephemeral(ctx: Context<'_>, content: String) -> Result<()> {
    ctx.send(CreateReply::default().content(content).ephemeral(true))
        .await?;
    Ok(())
}

/// Makes the bot mention the specified user repeatedly.
#[poise::command(slash_command, guild_only)]
pub async fn shutup(
    ctx: Context<'_>,
    #[description = "The user to be mentioned"] user: User,
) -> Result<()> {
    let data = ctx.data();
    let broadcaster = data.broadcaster();
    let sink = ChannelSink::new(ctx.serenity_context().http.clone(), ctx.channel_id());

    let started = broadcaster.start(
        ctx.author().id,
        invoker_permissions(ctx),
        user.mention().to_string(),
        sink,
        data.shutdown().child_token(),
    );

    match started {
        Ok(_job) => {
            reply_ephemeral(
                ctx,
                format!(
                    "Mentioning {} {} times.",
                    user.mention(),
                    broadcaster.count()
                ),
            )
            .await
        }
        Err(e @ BotError::MissingPermission(_)) => reply_ephemeral(ctx, e.user_message()).await,
        Err(e) => Err(e),
    }
}

/// Get available broadcast commands.
#[must_use]
pub fn broadcast_commands() -> Vec<poise::Command<Data, BotError>> {
    vec![shutup()]
}
