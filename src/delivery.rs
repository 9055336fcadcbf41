//! Getting generated text into Discord within the per-message size limit.

mod chunking;
mod sink;

pub use chunking::{DISCORD_MESSAGE_LIMIT, DeliveryMode, chunk, truncate};
pub use sink::{ChannelSink, MessageSink, deliver};

#[cfg(test)]
pub(crate) use sink::tests::RecordingSink;
