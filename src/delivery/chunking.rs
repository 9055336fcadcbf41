//! Fitting arbitrary-length text into bounded Discord messages.

use strum::{Display, EnumString, VariantNames};

/// Maximum characters Discord accepts in one message.
pub const DISCORD_MESSAGE_LIMIT: usize = 2000;

const ELLIPSIS: char = '…';

/// How an over-long reply is turned into messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, VariantNames, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DeliveryMode {
    /// Lossless: consecutive slices of at most `limit` characters.
    #[default]
    Split,
    /// Lossy: a single message cut short with an ellipsis.
    Truncate,
}

impl DeliveryMode {
    /// Turn `text` into the ordered messages to send.
    #[must_use]
    pub fn fragments(self, text: &str, limit: usize) -> Vec<String> {
        match self {
            DeliveryMode::Split => chunk(text, limit),
            DeliveryMode::Truncate if text.is_empty() => Vec::new(),
            DeliveryMode::Truncate => vec![truncate(text, limit)],
        }
    }
}

/// Split `text` into consecutive slices of at most `limit` characters.
///
/// Concatenating the result gives back `text`. Empty text yields no chunks.
/// A `limit` of zero is treated as one.
#[must_use]
pub fn chunk(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let mut chunks = Vec::with_capacity(text.len().div_ceil(limit));
    let mut start = 0;

    for (count, (idx, _)) in text.char_indices().enumerate() {
        if count > 0 && count % limit == 0 {
            chunks.push(text[start..idx].to_string());
            start = idx;
        }
    }
    if start < text.len() {
        chunks.push(text[start..].to_string());
    }

    chunks
}

/// Cut `text` to at most `limit` characters, marking the cut with `…`.
#[must_use]
pub fn truncate(text: &str, limit: usize) -> String {
    let limit = limit.max(1);
    match text.char_indices().nth(limit) {
        None => text.to_string(),
        Some(_) => {
            let keep = text
                .char_indices()
                .nth(limit - 1)
                .map_or(text.len(), |(idx, _)| idx);
            let mut cut = text[..keep].to_string();
            cut.push(ELLIPSIS);
            cut
        }
    }
}
