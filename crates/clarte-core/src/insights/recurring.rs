use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::entry::{DatedEntry, StepIndex};

/// A word that keeps coming back in one step's answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringItem {
    pub word: String,
    pub count: usize,
    /// Capitalized word for display.
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringItems {
    pub step: StepIndex,
    pub items: Vec<RecurringItem>,
    /// Set when no word qualified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RecurringItems {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Shown in place of an empty ranking for `step`.
pub fn empty_message(step: StepIndex) -> &'static str {
    match step {
        StepIndex::VISION => "Pas encore de visions enregistrées",
        StepIndex::OBSTACLE => "Aucun obstacle identifié pour le moment",
        StepIndex::ACTION => "Aucune action enregistrée encore",
        _ => "Rien de récurrent pour le moment",
    }
}

/// Lower-cased words of at least `min_chars` letters.
///
/// Everything that is neither a letter nor whitespace is dropped before
/// splitting, so "l'équipe" becomes "léquipe".
pub fn tokenize(text: &str, min_chars: usize) -> Vec<String> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_alphabetic() || c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    cleaned
        .split_whitespace()
        .filter(|w| w.chars().count() >= min_chars)
        .map(str::to_owned)
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Most frequent words of `step` across `entries`.
///
/// Equal counts keep the order in which the words were first met.
pub fn top_items(
    entries: &[DatedEntry],
    step: StepIndex,
    min_chars: usize,
    limit: usize,
) -> RecurringItems {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for dated in entries {
        for word in tokenize(dated.entry.text(step), min_chars) {
            *counts.entry(word).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(limit);

    let items: Vec<RecurringItem> = ranked
        .into_iter()
        .map(|(word, count)| RecurringItem {
            label: capitalize(&word),
            word,
            count,
        })
        .collect();
    let message = items
        .is_empty()
        .then(|| empty_message(step).to_string());

    RecurringItems {
        step,
        items,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::JournalEntry;
    use chrono::NaiveDate;

    fn with_vision(day: u32, text: &str) -> DatedEntry {
        let mut entry = JournalEntry::default();
        entry.set_step(StepIndex::VISION, text);
        DatedEntry::new(NaiveDate::from_ymd_opt(2024, 3, day).unwrap(), entry)
    }

    #[test]
    fn tokenize_strips_punctuation_and_short_words() {
        assert_eq!(
            tokenize("Être CALME, serein; avec l'équipe!", 5),
            vec!["calme", "serein", "léquipe"]
        );
    }

    #[test]
    fn tokenize_counts_accented_letters_as_one() {
        // "été" has three chars even though it is five bytes.
        assert!(tokenize("été", 4).is_empty());
        assert_eq!(tokenize("rêvés", 5), vec!["rêvés"]);
    }

    #[test]
    fn ranks_by_count_then_first_seen() {
        let entries = vec![
            with_vision(3, "paix calme force"),
            with_vision(2, "force calme"),
            with_vision(1, "lumière"),
        ];
        let top = top_items(&entries, StepIndex::VISION, 5, 3);
        let words: Vec<_> = top.items.iter().map(|i| i.word.as_str()).collect();
        assert_eq!(words, vec!["calme", "force", "lumière"]);
        assert_eq!(top.items[0].count, 2);
        assert_eq!(top.items[0].label, "Calme");
        assert!(top.message.is_none());
    }

    #[test]
    fn empty_ranking_carries_message() {
        let entries = vec![with_vision(1, "oui non")];
        let top = top_items(&entries, StepIndex::VISION, 5, 3);
        assert!(top.is_empty());
        assert_eq!(top.message.as_deref(), Some(empty_message(StepIndex::VISION)));
    }

    #[test]
    fn capitalize_handles_accents() {
        assert_eq!(capitalize("élan"), "Élan");
    }
}
