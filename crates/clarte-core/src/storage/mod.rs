mod config;
pub mod database;
pub mod memory;
pub mod migrations;

pub use config::{Config, ExportConfig, HistoryConfig, InsightsConfig, SessionConfig};
pub use database::Database;
pub use memory::MemoryStore;

use std::path::PathBuf;

use chrono::{Duration, NaiveDate};

use crate::entry::{date_key, DatedEntry, JournalEntry};
use crate::error::StoreError;

/// Key prefix of journal entries in the key-value table.
pub const ENTRY_KEY_PREFIX: &str = "journey_";
/// Key prefix under which unreadable entries are set aside.
pub const QUARANTINE_KEY_PREFIX: &str = "corrupt_journey_";
/// Default history scan horizon.
pub const DEFAULT_HORIZON_DAYS: u32 = 365;
/// Longest history scan and insight window, in days.
pub const MAX_HORIZON_DAYS: u32 = 365;

pub(crate) fn entry_key(date: NaiveDate) -> String {
    format!("{ENTRY_KEY_PREFIX}{}", date_key(date))
}

/// Side key for the `attempt`-th quarantine of `date`. Later attempts get a
/// numeric suffix so earlier raw values are kept.
pub(crate) fn quarantine_key(date: NaiveDate, attempt: u32) -> String {
    match attempt {
        0 => format!("{QUARANTINE_KEY_PREFIX}{}", date_key(date)),
        n => format!("{QUARANTINE_KEY_PREFIX}{}.{n}", date_key(date)),
    }
}

pub(crate) fn encode_entry(entry: &JournalEntry) -> Result<String, StoreError> {
    serde_json::to_string(entry).map_err(|e| StoreError::Serialize(e.to_string()))
}

pub(crate) fn decode_entry(date: NaiveDate, raw: &str) -> Result<JournalEntry, StoreError> {
    serde_json::from_str(raw).map_err(|e| StoreError::CorruptEntry {
        date,
        raw: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Persistence of one [`JournalEntry`] per calendar date.
///
/// Writes are atomic per date key; the last writer for a key wins.
pub trait EntryStore {
    /// Stored entry for `date`, `None` when the day has no entry.
    ///
    /// # Errors
    /// [`StoreError::CorruptEntry`] when the stored value cannot be decoded.
    fn get(&self, date: NaiveDate) -> Result<Option<JournalEntry>, StoreError>;

    /// Overwrite the entry for `date`.
    fn put(&self, date: NaiveDate, entry: &JournalEntry) -> Result<(), StoreError>;

    /// Write only if nothing is stored for `date`. Returns whether a write occurred.
    ///
    /// An unreadable value counts as present.
    fn merge_if_absent(&self, date: NaiveDate, entry: &JournalEntry) -> Result<bool, StoreError>;

    /// Remove every journal entry, leaving other persisted state alone.
    fn delete_all(&self) -> Result<usize, StoreError>;

    /// Move the raw value for `date` aside so the slot can be rewritten.
    ///
    /// Earlier quarantined values for the same day are never overwritten.
    /// Returns the raw value that was moved, if any.
    fn quarantine(&self, date: NaiveDate) -> Result<Option<String>, StoreError>;

    /// Completed entries of the last `horizon_days` days, newest first.
    ///
    /// The horizon is capped at [`MAX_HORIZON_DAYS`]. Unreadable days are
    /// skipped with a warning and left in place.
    fn list_completed(
        &self,
        today: NaiveDate,
        horizon_days: u32,
    ) -> Result<Vec<DatedEntry>, StoreError> {
        let mut entries = Vec::new();
        for offset in 0..i64::from(horizon_days.min(MAX_HORIZON_DAYS)) {
            let date = today - Duration::days(offset);
            match self.get(date) {
                Ok(Some(entry)) if entry.is_completed() => {
                    entries.push(DatedEntry::new(date, entry));
                }
                Ok(_) => {}
                Err(StoreError::CorruptEntry { date, reason, .. }) => {
                    tracing::warn!(%date, %reason, "skipping unreadable journal entry");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(entries)
    }
}

impl<T: EntryStore + ?Sized> EntryStore for &T {
    fn get(&self, date: NaiveDate) -> Result<Option<JournalEntry>, StoreError> {
        (**self).get(date)
    }

    fn put(&self, date: NaiveDate, entry: &JournalEntry) -> Result<(), StoreError> {
        (**self).put(date, entry)
    }

    fn merge_if_absent(&self, date: NaiveDate, entry: &JournalEntry) -> Result<bool, StoreError> {
        (**self).merge_if_absent(date, entry)
    }

    fn delete_all(&self) -> Result<usize, StoreError> {
        (**self).delete_all()
    }

    fn quarantine(&self, date: NaiveDate) -> Result<Option<String>, StoreError> {
        (**self).quarantine(date)
    }

    fn list_completed(
        &self,
        today: NaiveDate,
        horizon_days: u32,
    ) -> Result<Vec<DatedEntry>, StoreError> {
        (**self).list_completed(today, horizon_days)
    }
}

/// Returns the data directory.
///
/// `CLARTE_DATA_DIR` wins when set; otherwise `~/.config/clarte[-dev]/`
/// depending on `CLARTE_ENV`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("CLARTE_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("CLARTE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("clarte-dev")
            } else {
                base_dir.join("clarte")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
