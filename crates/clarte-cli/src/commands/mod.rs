pub mod config;
pub mod history;
pub mod insights;
pub mod journal;
pub mod stats;
pub mod transfer;

use clarte_core::error::StoreError;
use clarte_core::{Clock, Config, Database, DatedEntry, EntryStore, SystemClock};

/// Completed entries inside the configured horizon, newest first.
pub(crate) fn completed_entries(
    db: &Database,
    config: &Config,
) -> Result<Vec<DatedEntry>, StoreError> {
    db.list_completed(SystemClock.today(), config.history.horizon_days)
}
