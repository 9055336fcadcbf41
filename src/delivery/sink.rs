//! Outbound message sinks and ordered fragment delivery.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, error, warn};
use poise::serenity_prelude::{ChannelId, CreateMessage, Http, MessageId};

use crate::error::Result;

/// Somewhere a single bounded text message can be posted.
pub trait MessageSink: Send + Sync {
    fn send(&self, content: &str) -> impl Future<Output = Result<()>> + Send;
}

impl<S: MessageSink> MessageSink for Arc<S> {
    async fn send(&self, content: &str) -> Result<()> {
        (**self).send(content).await
    }
}

/// Posts into a Discord channel, optionally replying to a message with the
/// first fragment only.
pub struct ChannelSink {
    http: Arc<Http>,
    channel_id: ChannelId,
    reply_to: Option<MessageId>,
    replied: AtomicBool,
}

impl ChannelSink {
    #[must_use]
    pub fn new(http: Arc<Http>, channel_id: ChannelId) -> Self {
        Self {
            http,
            channel_id,
            reply_to: None,
            replied: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn replying_to(mut self, message_id: MessageId) -> Self {
        self.reply_to = Some(message_id);
        self
    }

    /// The message to reference, until one send carrying it has succeeded.
    fn pending_reply(&self) -> Option<MessageId> {
        self.reply_to.filter(|_| !self.replied.load(Ordering::Acquire))
    }
}

impl MessageSink for ChannelSink {
    async fn send(&self, content: &str) -> Result<()> {
        let mut message = CreateMessage::new().content(content);
        let reply_to = self.pending_reply();
        if let Some(message_id) = reply_to {
            message = message.reference_message((self.channel_id, message_id));
        }

        self.channel_id.send_message(&self.http, message).await?;
        if reply_to.is_some() {
            self.replied.store(true, Ordering::Release);
        }
        Ok(())
    }
}

/// Send `fragments` in order, one message each.
///
/// A rejected fragment is retried once; if the retry fails too the error is
/// returned and the remaining fragments are not sent.
///
/// # Errors
///
/// Returns the sink error of a fragment that failed twice.
pub async fn deliver<S: MessageSink>(sink: &S, fragments: &[String]) -> Result<usize> {
    for (idx, fragment) in fragments.iter().enumerate() {
        if let Err(e) = sink.send(fragment).await {
            warn!(
                "Sending fragment {}/{} failed, retrying once: {e}",
                idx + 1,
                fragments.len()
            );
            sink.send(fragment).await.map_err(|e| {
                error!(
                    "Giving up on fragment {}/{} after retry: {e}",
                    idx + 1,
                    fragments.len()
                );
                e
            })?;
        }
        debug!("Delivered fragment {}/{}", idx + 1, fragments.len());
    }

    Ok(fragments.len())
}
