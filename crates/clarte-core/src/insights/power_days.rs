use chrono::{Datelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::entry::DatedEntry;

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

const DAY_NAMES: [&str; 7] = [
    "Dimanche", "Lundi", "Mardi", "Mercredi", "Jeudi", "Vendredi", "Samedi",
];

const EMPTY_MESSAGE: &str = "Continuez votre pratique pour identifier vos jours de puissance";

/// French name of a weekday.
pub fn day_name(weekday: Weekday) -> &'static str {
    DAY_NAMES[weekday.num_days_from_sunday() as usize]
}

/// Commitment tally for one weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayStat {
    pub weekday: Weekday,
    pub name: String,
    pub total: u32,
    pub committed: u32,
    /// Rounded commitment rate.
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerDayReport {
    /// Qualifying weekdays, best first.
    pub ranking: Vec<WeekdayStat>,
    pub message: String,
}

impl PowerDayReport {
    pub fn top(&self) -> Option<&WeekdayStat> {
        self.ranking.first()
    }
}

fn percentage(committed: u32, total: u32) -> u32 {
    // round half up without going through floats
    (committed * 200 + total) / (total * 2)
}

/// Weekdays ranked by commitment rate.
///
/// Weekdays with fewer than `min_samples` entries are left out. Equal rates
/// keep Sunday-first order.
pub fn power_days(entries: &[DatedEntry], min_samples: u32) -> PowerDayReport {
    let mut totals = [(0u32, 0u32); 7];
    for dated in entries {
        let slot = &mut totals[dated.date.weekday().num_days_from_sunday() as usize];
        slot.0 += 1;
        if dated.entry.is_committed() {
            slot.1 += 1;
        }
    }

    let mut ranking: Vec<WeekdayStat> = totals
        .iter()
        .zip(WEEKDAYS)
        .filter(|((total, _), _)| *total >= min_samples.max(1))
        .map(|(&(total, committed), weekday)| {
            WeekdayStat {
                weekday,
                name: day_name(weekday).to_string(),
                total,
                committed,
                percentage: percentage(committed, total),
            }
        })
        .collect();
    ranking.sort_by(|a, b| b.percentage.cmp(&a.percentage));

    let message = match ranking.first() {
        Some(top) => format!(
            "Votre jour le plus engagé : {} ({}% d'engagement)",
            top.name, top.percentage
        ),
        None => EMPTY_MESSAGE.to_string(),
    };

    PowerDayReport { ranking, message }
}
