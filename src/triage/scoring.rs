//! Intent scoring for automatic replies.

use log::debug;

use super::keywords::KeywordTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreResult {
    pub score: i32,
    pub triggered: bool,
}

/// Score `text` against `table`.
///
/// Terms are matched as lowercase substrings, so overlapping terms
/// ("css" inside "quickcss") both count.
#[must_use]
pub fn score(text: &str, addressed: bool, table: &KeywordTable) -> ScoreResult {
    let normalized = text.to_lowercase();
    let mut score = 0;

    if addressed {
        score += table.mention_bonus;
    }
    if !table.anchor.term.is_empty() && normalized.contains(&table.anchor.term) {
        score += table.anchor.weight;
    }
    score += table
        .entries
        .iter()
        .filter(|entry| !entry.term.is_empty() && normalized.contains(&entry.term))
        .map(|entry| entry.weight)
        .sum::<i32>();

    let triggered = score >= table.threshold;
    debug!(
        "Intent score {score} (threshold {}, addressed {addressed}): triggered={triggered}",
        table.threshold
    );

    ScoreResult { score, triggered }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triage::keywords::{KeywordEntry, TriggerPolicy};

    fn scenario_table() -> KeywordTable {
        KeywordTable::weighted(
            vec![
                KeywordEntry::new("css", 2),
                KeywordEntry::new("vencord", 2),
                KeywordEntry::new("fix", 1),
                KeywordEntry::new("theme", 1),
            ],
            KeywordEntry::new("chillax", 2),
            3,
            3,
        )
    }

    #[test]
    fn keywords_sum_past_threshold() {
        let result = score("can you fix my vencord css theme", false, &scenario_table());
        assert_eq!(
            result,
            ScoreResult {
                score: 6,
                triggered: true
            }
        );
    }

    #[test]
    fn matching_ignores_case() {
        let result = score("VENCORD CSS", false, &scenario_table());
        assert_eq!(result.score, 4);
    }

    #[test]
    fn a_single_light_keyword_stays_below_threshold() {
        let result = score("I need to fix my bike", false, &scenario_table());
        assert_eq!(result.score, 1);
        assert!(!result.triggered);
    }

    #[test]
    fn direct_address_always_triggers() {
        let result = score("", true, &scenario_table());
        assert_eq!(result.score, 3);
        assert!(result.triggered);
    }

    #[test]
    fn anchor_adds_its_bonus_once() {
        let result = score("chillax chillax", false, &scenario_table());
        assert_eq!(result.score, 2);
    }

    #[test]
    fn empty_text_scores_zero() {
        let result = score("", false, &scenario_table());
        assert_eq!(
            result,
            ScoreResult {
                score: 0,
                triggered: false
            }
        );
    }

    #[test]
    fn overlapping_terms_double_count() {
        let table = KeywordTable::weighted(
            vec![KeywordEntry::new("css", 2), KeywordEntry::new("quickcss", 2)],
            KeywordEntry::new("chillax", 0),
            3,
            3,
        );
        assert_eq!(score("my quickcss", false, &table).score, 4);
    }

    #[test]
    fn any_policy_triggers_on_one_keyword() {
        let table = KeywordTable::for_policy(TriggerPolicy::Any);
        assert!(score("where do I paste the snippet", false, &table).triggered);
        assert!(!score("good morning", false, &table).triggered);
    }

    #[test]
    fn mention_policy_ignores_keywords() {
        let table = KeywordTable::for_policy(TriggerPolicy::Mention);
        assert!(!score("chillax vencord css fix", false, &table).triggered);
        assert!(score("chillax vencord css fix", true, &table).triggered);
    }

    #[test]
    fn triggered_iff_score_reaches_threshold() {
        let table = KeywordTable::default();
        for text in [
            "",
            "hi",
            "css",
            "vencord css",
            "chillax help",
            "how do i fix the theme",
        ] {
            for addressed in [false, true] {
                let first = score(text, addressed, &table);
                assert_eq!(first, score(text, addressed, &table));
                assert_eq!(first.triggered, first.score >= table.threshold);
            }
        }
    }
}
