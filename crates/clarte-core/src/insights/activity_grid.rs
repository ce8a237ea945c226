use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::entry::DatedEntry;
use crate::storage::MAX_HORIZON_DAYS;

/// Column headers, Monday first.
pub const WEEKDAY_LABELS: [&str; 7] = ["L", "M", "M", "J", "V", "S", "D"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayState {
    Absent,
    Completed,
    Committed,
}

impl DayState {
    pub fn symbol(self) -> char {
        match self {
            DayState::Absent => '·',
            DayState::Completed => '○',
            DayState::Committed => '●',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCell {
    pub date: NaiveDate,
    /// Day of month.
    pub day: u32,
    pub state: DayState,
}

/// Recent days laid out on a Monday-first week grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityGrid {
    /// Empty cells before the first day so it lands in its weekday column.
    pub leading_blanks: usize,
    /// Oldest to newest.
    pub cells: Vec<DayCell>,
}

impl ActivityGrid {
    /// Week rows of seven slots; `None` for padding.
    pub fn rows(&self) -> Vec<Vec<Option<&DayCell>>> {
        let slots: Vec<Option<&DayCell>> = std::iter::repeat(None)
            .take(self.leading_blanks)
            .chain(self.cells.iter().map(Some))
            .collect();
        slots.chunks(7).map(<[_]>::to_vec).collect()
    }

    pub fn count(&self, state: DayState) -> usize {
        self.cells.iter().filter(|c| c.state == state).count()
    }
}

/// Grid for the `days` days ending today.
pub fn activity_grid(entries: &[DatedEntry], today: NaiveDate, days: u32) -> ActivityGrid {
    let days = days.clamp(1, MAX_HORIZON_DAYS);
    let start = today - Duration::days(i64::from(days) - 1);
    let by_date: HashMap<NaiveDate, DayState> = entries
        .iter()
        .filter(|e| e.entry.is_completed())
        .map(|e| {
            let state = if e.entry.is_committed() {
                DayState::Committed
            } else {
                DayState::Completed
            };
            (e.date, state)
        })
        .collect();

    let cells = (0..i64::from(days))
        .map(|i| {
            let date = start + Duration::days(i);
            DayCell {
                date,
                day: date.day(),
                state: by_date.get(&date).copied().unwrap_or(DayState::Absent),
            }
        })
        .collect();

    ActivityGrid {
        leading_blanks: start.weekday().num_days_from_monday() as usize,
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::JournalEntry;
    use chrono::DateTime;

    fn completed(date: NaiveDate, committed: bool) -> DatedEntry {
        DatedEntry::new(
            date,
            JournalEntry {
                committed: Some(committed),
                completed_at: Some(DateTime::parse_from_rfc3339("2024-03-01T20:00:00Z").unwrap()),
                ..Default::default()
            },
        )
    }

    #[test]
    fn pads_to_monday_first_layout() {
        // 2024-03-30 minus 29 days is Friday 2024-03-01.
        let today = NaiveDate::from_ymd_opt(2024, 3, 30).unwrap();
        let grid = activity_grid(&[], today, 30);
        assert_eq!(grid.leading_blanks, 4);
        assert_eq!(grid.cells.len(), 30);
        assert_eq!(grid.cells[0].day, 1);
        assert_eq!(grid.cells[29].date, today);
    }

    #[test]
    fn sunday_start_gets_six_blanks() {
        // 2024-04-01 minus 29 days is Sunday 2024-03-03.
        let today = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let grid = activity_grid(&[], today, 30);
        assert_eq!(grid.cells[0].date, NaiveDate::from_ymd_opt(2024, 3, 3).unwrap());
        assert_eq!(grid.leading_blanks, 6);
        assert_eq!(grid.rows()[0].iter().filter(|c| c.is_some()).count(), 1);
    }

    #[test]
    fn cell_states_follow_entries() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 30).unwrap();
        let entries = vec![
            completed(today, true),
            completed(today - Duration::days(1), false),
        ];
        let grid = activity_grid(&entries, today, 30);
        assert_eq!(grid.cells[29].state, DayState::Committed);
        assert_eq!(grid.cells[28].state, DayState::Completed);
        assert_eq!(grid.count(DayState::Absent), 28);
    }

    #[test]
    fn oversized_window_is_clamped() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 30).unwrap();
        let grid = activity_grid(&[], today, u32::MAX);
        assert_eq!(grid.cells.len(), MAX_HORIZON_DAYS as usize);
        assert_eq!(grid.cells[grid.cells.len() - 1].date, today);
    }
}
