use serde::{Deserialize, Serialize};

use crate::entry::{DatedEntry, StepIndex};

/// Direction of the practice over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    InsufficientHistory,
    DetailIncreasing,
    EngagementIncreasing,
    Stable,
    Progressing,
}

impl Trend {
    pub fn message(self) -> &'static str {
        match self {
            Trend::InsufficientHistory => "Continuez votre pratique pour voir votre évolution",
            Trend::DetailIncreasing => {
                "Vos micro-pas deviennent plus précis et détaillés au fil du temps."
            }
            Trend::EngagementIncreasing => {
                "Votre taux d'engagement augmente. Vous passez de plus en plus à l'action."
            }
            Trend::Stable => "Votre pratique est stable. La constance crée la transformation.",
            Trend::Progressing => "Votre pratique progresse. Continuez sur cette voie.",
        }
    }
}

/// Averages for one end of the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendWindow {
    pub entries: usize,
    pub avg_action_chars: f64,
    pub committed: usize,
}

impl TrendWindow {
    fn measure(entries: &[DatedEntry]) -> Self {
        let chars: usize = entries
            .iter()
            .map(|e| e.entry.text(StepIndex::ACTION).chars().count())
            .sum();
        let avg_action_chars = if entries.is_empty() {
            0.0
        } else {
            chars as f64 / entries.len() as f64
        };
        Self {
            entries: entries.len(),
            avg_action_chars,
            committed: entries.iter().filter(|e| e.entry.is_committed()).count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionReport {
    pub trend: Trend,
    pub message: String,
    /// Newest entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent: Option<TrendWindow>,
    /// Oldest entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub older: Option<TrendWindow>,
}

/// Compare the `window` newest entries against the `window` oldest.
///
/// `entries` must be newest first. The two windows overlap when there are
/// fewer than `2 * window` entries.
pub fn evolution(entries: &[DatedEntry], window: usize, growth_ratio: f64) -> EvolutionReport {
    let window = window.max(1);
    if entries.len() < window {
        return EvolutionReport {
            trend: Trend::InsufficientHistory,
            message: Trend::InsufficientHistory.message().to_string(),
            recent: None,
            older: None,
        };
    }

    let recent = TrendWindow::measure(&entries[..window]);
    let older = TrendWindow::measure(&entries[entries.len() - window..]);

    let trend = if recent.avg_action_chars > older.avg_action_chars * growth_ratio {
        Trend::DetailIncreasing
    } else if entries.len() >= window * 2 {
        if recent.committed > older.committed {
            Trend::EngagementIncreasing
        } else {
            Trend::Stable
        }
    } else {
        Trend::Progressing
    };

    EvolutionReport {
        trend,
        message: trend.message().to_string(),
        recent: Some(recent),
        older: Some(older),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::JournalEntry;
    use chrono::{DateTime, Duration, NaiveDate};

    fn entry(offset: i64, action: &str, committed: bool) -> DatedEntry {
        let mut e = JournalEntry {
            committed: Some(committed),
            completed_at: Some(DateTime::parse_from_rfc3339("2024-03-01T20:00:00Z").unwrap()),
            ..Default::default()
        };
        e.set_step(StepIndex::ACTION, action);
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        DatedEntry::new(today - Duration::days(offset), e)
    }

    /// Newest first: `recent` describes the first `n_recent`, `older` the rest.
    fn history(
        n_recent: usize,
        recent: (&str, bool),
        n_older: usize,
        older: (&str, bool),
    ) -> Vec<DatedEntry> {
        (0..n_recent)
            .map(|i| entry(i as i64, recent.0, recent.1))
            .chain((0..n_older).map(|i| entry((n_recent + i) as i64, older.0, older.1)))
            .collect()
    }

    #[test]
    fn needs_a_full_window() {
        let report = evolution(&history(6, ("abc", true), 0, ("", false)), 7, 1.2);
        assert_eq!(report.trend, Trend::InsufficientHistory);
        assert!(report.recent.is_none());
    }

    #[test]
    fn longer_recent_actions_mean_more_detail() {
        let entries = history(7, ("appeler le médecin demain", false), 7, ("appeler", false));
        assert_eq!(evolution(&entries, 7, 1.2).trend, Trend::DetailIncreasing);
    }

    #[test]
    fn exactly_twenty_percent_longer_is_not_enough() {
        // 12 vs 10 chars
        let entries = history(7, ("abcdefghijkl", false), 7, ("abcdefghij", true));
        assert_eq!(evolution(&entries, 7, 1.2).trend, Trend::Stable);
    }

    #[test]
    fn more_recent_commitments_mean_rising_engagement() {
        let entries = history(7, ("marcher", true), 7, ("marcher", false));
        assert_eq!(evolution(&entries, 7, 1.2).trend, Trend::EngagementIncreasing);
    }

    #[test]
    fn equal_commitments_are_stable() {
        let entries = history(7, ("marcher", true), 7, ("marcher", true));
        let report = evolution(&entries, 7, 1.2);
        assert_eq!(report.trend, Trend::Stable);
        assert_eq!(report.message, Trend::Stable.message());
    }

    #[test]
    fn between_one_and_two_windows_is_progressing() {
        let entries = history(10, ("marcher", true), 0, ("", false));
        assert_eq!(evolution(&entries, 7, 1.2).trend, Trend::Progressing);
    }
}
