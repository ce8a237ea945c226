use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::entry::DatedEntry;
use crate::storage::MAX_HORIZON_DAYS;

/// Qualitative level of recent regularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstancyBand {
    Start,
    Beginning,
    Building,
    Solid,
    Remarkable,
}

impl ConstancyBand {
    pub fn from_count(count: usize) -> Self {
        match count {
            0 => ConstancyBand::Start,
            1..=6 => ConstancyBand::Beginning,
            7..=14 => ConstancyBand::Building,
            15..=24 => ConstancyBand::Solid,
            _ => ConstancyBand::Remarkable,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ConstancyBand::Start => "Commencez votre pratique pour voir votre progression",
            ConstancyBand::Beginning => "Vous êtes au début de votre parcours. Continuez.",
            ConstancyBand::Building => {
                "Votre constance se construit. Vous êtes sur la bonne voie."
            }
            ConstancyBand::Solid => "Votre pratique devient une habitude solide.",
            ConstancyBand::Remarkable => "Vous êtes extrêmement constant. C'est remarquable.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstancyReport {
    /// Completed days inside the window.
    pub count: usize,
    pub window_days: u32,
    pub band: ConstancyBand,
    pub message: String,
}

impl ConstancyReport {
    /// `count/window`, e.g. `12/30`.
    pub fn ratio_label(&self) -> String {
        format!("{}/{}", self.count, self.window_days)
    }
}

/// Completed entries dated within the last `window_days` days, today included.
///
/// The window is clamped to `1..=MAX_HORIZON_DAYS`.
pub fn constancy(entries: &[DatedEntry], today: NaiveDate, window_days: u32) -> ConstancyReport {
    let window_days = window_days.clamp(1, MAX_HORIZON_DAYS);
    let first_day = today - Duration::days(i64::from(window_days) - 1);
    let count = entries
        .iter()
        .filter(|e| e.entry.is_completed() && e.date >= first_day && e.date <= today)
        .count();
    let band = ConstancyBand::from_count(count);
    ConstancyReport {
        count,
        window_days,
        band,
        message: band.message().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::JournalEntry;
    use chrono::DateTime;

    fn completed_on(date: NaiveDate, committed: bool) -> DatedEntry {
        let at = format!("{}T20:00:00+00:00", crate::entry::date_key(date));
        DatedEntry::new(
            date,
            JournalEntry {
                committed: Some(committed),
                completed_at: Some(DateTime::parse_from_rfc3339(&at).unwrap()),
                ..Default::default()
            },
        )
    }

    #[test]
    fn band_thresholds() {
        assert_eq!(ConstancyBand::from_count(0), ConstancyBand::Start);
        assert_eq!(ConstancyBand::from_count(6), ConstancyBand::Beginning);
        assert_eq!(ConstancyBand::from_count(7), ConstancyBand::Building);
        assert_eq!(ConstancyBand::from_count(14), ConstancyBand::Building);
        assert_eq!(ConstancyBand::from_count(15), ConstancyBand::Solid);
        assert_eq!(ConstancyBand::from_count(24), ConstancyBand::Solid);
        assert_eq!(ConstancyBand::from_count(25), ConstancyBand::Remarkable);
    }

    #[test]
    fn thirty_days_present_is_top_band_regardless_of_commitment() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 30).unwrap();
        let entries: Vec<_> = (0..30)
            .map(|i| completed_on(today - Duration::days(i), i < 20))
            .collect();
        let report = constancy(&entries, today, 30);
        assert_eq!(report.count, 30);
        assert_eq!(report.band, ConstancyBand::Remarkable);
        assert_eq!(report.ratio_label(), "30/30");
    }

    #[test]
    fn days_outside_window_are_not_counted() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 30).unwrap();
        let entries = vec![
            completed_on(today, true),
            completed_on(today - Duration::days(29), true),
            completed_on(today - Duration::days(30), true),
        ];
        assert_eq!(constancy(&entries, today, 30).count, 2);
    }

    #[test]
    fn oversized_window_is_clamped_instead_of_overflowing() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 30).unwrap();
        let entries = vec![completed_on(today, true)];
        let report = constancy(&entries, today, u32::MAX);
        assert_eq!(report.count, 1);
        assert_eq!(report.window_days, MAX_HORIZON_DAYS);
    }
}
