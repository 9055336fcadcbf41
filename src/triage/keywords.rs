//! Weighted domain vocabulary used to gate automatic replies.

use strum::{Display, EnumString, VariantNames};

/// A term whose presence in a message adds `weight` to its intent score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordEntry {
    pub term: String,
    pub weight: i32,
}

impl KeywordEntry {
    #[must_use]
    pub fn new(term: impl Into<String>, weight: i32) -> Self {
        Self {
            term: term.into().to_lowercase(),
            weight,
        }
    }
}

/// Read-only scoring parameters, built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordTable {
    pub entries: Vec<KeywordEntry>,
    /// Product name; its presence adds `weight` once.
    pub anchor: KeywordEntry,
    /// Added when the bot is mentioned directly. Never below `threshold`.
    pub mention_bonus: i32,
    pub threshold: i32,
}

/// Which of the observed trigger behaviours the table encodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, VariantNames, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TriggerPolicy {
    /// Per-term weights summed against the threshold.
    #[default]
    Weighted,
    /// Any single keyword (or the anchor) triggers.
    Any,
    /// Only a direct mention triggers.
    Mention,
}

const ANCHOR: (&str, i32) = ("chillax", 2);
const THRESHOLD: i32 = 3;

const SUPPORT_KEYWORDS: &[(&str, i32)] = &[
    ("css", 2),
    ("vencord", 2),
    ("quickcss", 2),
    ("snippet", 2),
    ("theme", 1),
    ("fix", 1),
    ("help", 1),
    ("broken", 1),
    ("not working", 1),
    ("how do i", 1),
];

impl KeywordTable {
    /// Weighted table. The mention bonus is raised to `threshold` if lower.
    #[must_use]
    pub fn weighted(
        entries: Vec<KeywordEntry>,
        anchor: KeywordEntry,
        mention_bonus: i32,
        threshold: i32,
    ) -> Self {
        Self {
            entries,
            anchor,
            mention_bonus: mention_bonus.max(threshold),
            threshold,
        }
    }

    /// Boolean any-of table: every term weighs exactly `threshold`.
    #[must_use]
    pub fn any_of<I, T>(terms: I, anchor: &str, threshold: i32) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let entries = terms
            .into_iter()
            .map(|term| KeywordEntry::new(term, threshold))
            .collect();
        Self::weighted(entries, KeywordEntry::new(anchor, threshold), threshold, threshold)
    }

    /// Table that only a direct mention can satisfy.
    #[must_use]
    pub fn mention_only(anchor: &str, threshold: i32) -> Self {
        Self::weighted(Vec::new(), KeywordEntry::new(anchor, 0), threshold, threshold)
    }

    /// The built-in Chillax support vocabulary shaped by `policy`.
    #[must_use]
    pub fn for_policy(policy: TriggerPolicy) -> Self {
        let (anchor, anchor_bonus) = ANCHOR;
        match policy {
            TriggerPolicy::Weighted => Self::weighted(
                SUPPORT_KEYWORDS
                    .iter()
                    .map(|&(term, weight)| KeywordEntry::new(term, weight))
                    .collect(),
                KeywordEntry::new(anchor, anchor_bonus),
                THRESHOLD,
                THRESHOLD,
            ),
            TriggerPolicy::Any => Self::any_of(
                SUPPORT_KEYWORDS.iter().map(|&(term, _)| term),
                anchor,
                THRESHOLD,
            ),
            TriggerPolicy::Mention => Self::mention_only(anchor, THRESHOLD),
        }
    }
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self::for_policy(TriggerPolicy::default())
    }
}
