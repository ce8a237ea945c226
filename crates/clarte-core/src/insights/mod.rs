//! Insights over the completed journal history.
//!
//! Everything here is a pure function of the entries returned by
//! [`crate::storage::EntryStore::list_completed`] (newest first) and, where a
//! trailing window is involved, today's date.

mod activity_grid;
mod constancy;
mod evolution;
mod power_days;
mod recurring;

pub use activity_grid::{activity_grid, ActivityGrid, DayCell, DayState, WEEKDAY_LABELS};
pub use constancy::{constancy, ConstancyBand, ConstancyReport};
pub use evolution::{evolution, EvolutionReport, Trend, TrendWindow};
pub use power_days::{day_name, power_days, PowerDayReport, WeekdayStat};
pub use recurring::{empty_message, tokenize, top_items, RecurringItem, RecurringItems};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entry::{DatedEntry, StepIndex};
use crate::error::StoreError;
use crate::storage::{EntryStore, InsightsConfig};

/// Headline counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeStats {
    pub practice_count: usize,
    pub committed_count: usize,
}

/// Every insight computed in one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightsReport {
    pub today: NaiveDate,
    pub stats: PracticeStats,
    pub constancy: ConstancyReport,
    pub activity: ActivityGrid,
    pub visions: RecurringItems,
    pub obstacles: RecurringItems,
    pub actions: RecurringItems,
    pub power_days: PowerDayReport,
    pub evolution: EvolutionReport,
}

/// Computes insights with thresholds from [`InsightsConfig`].
#[derive(Debug, Clone, Default)]
pub struct InsightsAnalyzer {
    config: InsightsConfig,
}

impl InsightsAnalyzer {
    pub fn new(config: InsightsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InsightsConfig {
        &self.config
    }

    /// Completed and committed counts.
    pub fn practice_stats(&self, entries: &[DatedEntry]) -> PracticeStats {
        let completed = entries.iter().filter(|e| e.entry.is_completed());
        let (practice_count, committed_count) = completed.fold((0, 0), |(p, c), e| {
            (p + 1, c + usize::from(e.entry.is_committed()))
        });
        PracticeStats {
            practice_count,
            committed_count,
        }
    }

    pub fn constancy(&self, entries: &[DatedEntry], today: NaiveDate) -> ConstancyReport {
        constancy(entries, today, self.config.window_days)
    }

    pub fn activity_grid(&self, entries: &[DatedEntry], today: NaiveDate) -> ActivityGrid {
        activity_grid(entries, today, self.config.window_days)
    }

    pub fn top_items(&self, entries: &[DatedEntry], step: StepIndex) -> RecurringItems {
        top_items(
            entries,
            step,
            self.config.min_token_chars,
            self.config.top_items,
        )
    }

    pub fn power_days(&self, entries: &[DatedEntry]) -> PowerDayReport {
        power_days(entries, self.config.min_weekday_samples)
    }

    pub fn evolution(&self, entries: &[DatedEntry]) -> EvolutionReport {
        evolution(
            entries,
            self.config.trend_window,
            self.config.detail_growth_ratio,
        )
    }

    pub fn report(&self, entries: &[DatedEntry], today: NaiveDate) -> InsightsReport {
        InsightsReport {
            today,
            stats: self.practice_stats(entries),
            constancy: self.constancy(entries, today),
            activity: self.activity_grid(entries, today),
            visions: self.top_items(entries, StepIndex::VISION),
            obstacles: self.top_items(entries, StepIndex::OBSTACLE),
            actions: self.top_items(entries, StepIndex::ACTION),
            power_days: self.power_days(entries),
            evolution: self.evolution(entries),
        }
    }

    /// Load completed entries from `store` and report on them.
    pub fn report_from_store<S: EntryStore>(
        &self,
        store: &S,
        today: NaiveDate,
        horizon_days: u32,
    ) -> Result<InsightsReport, StoreError> {
        let entries = store.list_completed(today, horizon_days)?;
        tracing::debug!(entries = entries.len(), %today, "computing insights");
        Ok(self.report(&entries, today))
    }
}
