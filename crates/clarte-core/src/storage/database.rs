//! SQLite-based entry storage.
//!
//! Provides persistent storage for:
//! - One journal entry per calendar date (`journey_<date>` keys)
//! - Quarantined raw values of unreadable entries
//! - Key-value store for other application state

use std::path::Path;

use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::{data_dir, decode_entry, encode_entry, entry_key, migrations, quarantine_key, EntryStore};
use crate::entry::JournalEntry;
use crate::error::{DatabaseError, StoreError};

/// Matches `journey_*` keys only; `_` is a LIKE wildcard and must be escaped.
const ENTRY_KEY_PATTERN: &str = "key LIKE 'journey\\_%' ESCAPE '\\'";

/// SQLite database for journal entries.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data_dir>/clarte.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, DatabaseError> {
        let dir = data_dir().map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
        Self::open_at(&dir.join("clarte.db"))
    }

    /// Open (or create) the database file at `path`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        tracing::debug!(path = %path.display(), "opened journal database");
        Ok(db)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        migrations::migrate(&self.conn).map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Number of stored journal entries, completed or not.
    pub fn entry_count(&self) -> Result<u64, DatabaseError> {
        let count = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM kv WHERE {ENTRY_KEY_PATTERN}"),
            [],
            |row| row.get::<_, u64>(0),
        )?;
        Ok(count)
    }
}

impl EntryStore for Database {
    fn get(&self, date: NaiveDate) -> Result<Option<JournalEntry>, StoreError> {
        match self.kv_get(&entry_key(date))? {
            Some(raw) => decode_entry(date, &raw).map(Some),
            None => Ok(None),
        }
    }

    fn put(&self, date: NaiveDate, entry: &JournalEntry) -> Result<(), StoreError> {
        let value = encode_entry(entry)?;
        self.kv_set(&entry_key(date), &value)?;
        Ok(())
    }

    fn merge_if_absent(&self, date: NaiveDate, entry: &JournalEntry) -> Result<bool, StoreError> {
        let value = encode_entry(entry)?;
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![entry_key(date), value, Utc::now().to_rfc3339()],
        )?;
        Ok(inserted == 1)
    }

    fn delete_all(&self) -> Result<usize, StoreError> {
        let deleted = self
            .conn
            .execute(&format!("DELETE FROM kv WHERE {ENTRY_KEY_PATTERN}"), [])?;
        tracing::info!(deleted, "deleted all journal entries");
        Ok(deleted)
    }

    fn quarantine(&self, date: NaiveDate) -> Result<Option<String>, StoreError> {
        let key = entry_key(date);
        let Some(raw) = self.kv_get(&key)? else {
            return Ok(None);
        };
        let tx = self.conn.unchecked_transaction()?;
        let now = Utc::now().to_rfc3339();
        let mut attempt = 0;
        while tx.execute(
            "INSERT OR IGNORE INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![quarantine_key(date, attempt), raw, now],
        )? == 0
        {
            attempt += 1;
        }
        tx.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        tx.commit()?;
        tracing::warn!(%date, attempt, "moved unreadable journal entry aside");
        Ok(Some(raw))
    }
}
