//! Removal of the bot's own mention tokens from message text.

const MENTION_OPEN: &str = "<@";
const NICKNAME_MARKER: char = '!';
const MENTION_CLOSE: char = '>';

/// Remove every `<@self_id>` and `<@!self_id>` token, then trim.
///
/// Other users' mentions, role mentions and ids that merely start with
/// `self_id` are left untouched.
#[must_use]
pub fn sanitize(text: &str, self_id: &str) -> String {
    if self_id.is_empty() {
        return text.trim().to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(MENTION_OPEN) {
        let (before, candidate) = rest.split_at(start);
        out.push_str(before);
        if let Some(len) = self_mention_len(candidate, self_id) {
            rest = &candidate[len..];
        } else {
            out.push_str(MENTION_OPEN);
            rest = &candidate[MENTION_OPEN.len()..];
        }
    }
    out.push_str(rest);

    out.trim().to_string()
}

/// Byte length of the self-mention token at the start of `candidate`, if any.
fn self_mention_len(candidate: &str, self_id: &str) -> Option<usize> {
    let body = candidate.strip_prefix(MENTION_OPEN)?;
    let (marker_len, body) = match body.strip_prefix(NICKNAME_MARKER) {
        Some(body) => (NICKNAME_MARKER.len_utf8(), body),
        None => (0, body),
    };
    body.strip_prefix(self_id)?
        .starts_with(MENTION_CLOSE)
        .then_some(MENTION_OPEN.len() + marker_len + self_id.len() + MENTION_CLOSE.len_utf8())
}
