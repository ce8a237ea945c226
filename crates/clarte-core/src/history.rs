//! Listing of past practices, newest first.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::entry::{DatedEntry, StepIndex};
use crate::insights::day_name;
use crate::storage::HistoryConfig;

pub const EMPTY_HISTORY_MESSAGE: &str =
    "Aucune entrée pour le moment. Commencez votre pratique aujourd'hui.";

const NO_VISION: &str = "Pas de vision enregistrée";

const MONTH_NAMES: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

/// One past practice as shown in the history list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub date: NaiveDate,
    pub date_label: String,
    pub vision: String,
    pub committed: bool,
    pub action_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl HistoryItem {
    /// Status line with the action excerpt appended, e.g. `✓ Action engagée: marcher`.
    pub fn action_line(&self) -> String {
        match &self.action {
            Some(action) => format!("{}: {}", self.action_label, action),
            None => self.action_label.clone(),
        }
    }
}

/// Long French date, e.g. `vendredi 1 mars 2024`.
pub fn french_date_label(date: NaiveDate) -> String {
    format!(
        "{} {} {} {}",
        day_name(date.weekday()).to_lowercase(),
        date.day(),
        MONTH_NAMES[date.month0() as usize],
        date.year()
    )
}

/// First `max_chars` characters followed by `...` when `text` is longer.
pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// History items for the newest `config.list_limit` entries.
pub fn recent_history(entries: &[DatedEntry], config: &HistoryConfig) -> Vec<HistoryItem> {
    entries
        .iter()
        .take(config.list_limit)
        .map(|dated| {
            let entry = &dated.entry;
            let vision = match entry.step(StepIndex::VISION).filter(|t| !t.is_empty()) {
                Some(text) => truncate(text, config.vision_excerpt_chars),
                None => NO_VISION.to_string(),
            };
            let committed = entry.is_committed();
            let action_label = if committed {
                "✓ Action engagée"
            } else {
                "○ Pratique complétée"
            };
            HistoryItem {
                date: dated.date,
                date_label: french_date_label(dated.date),
                vision,
                committed,
                action_label: action_label.to_string(),
                action: entry
                    .step(StepIndex::ACTION)
                    .filter(|t| !t.is_empty())
                    .map(|t| truncate(t, config.action_excerpt_chars)),
            }
        })
        .collect()
}
