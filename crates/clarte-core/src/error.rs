//! Core error types for clarte-core.
//!
//! This module defines the error hierarchy using thiserror. Every variant is
//! recoverable at the boundary where it is detected; none is meant to abort
//! the process.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::session::SessionState;

/// Core error type for clarte-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Entry store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Session transition errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Import/export errors
    #[error("{0}")]
    Transfer(#[from] TransferError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Entry store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The stored value for a date could not be decoded.
    ///
    /// The raw value is carried along so callers can keep it.
    #[error("Corrupt entry for {date}: {reason}")]
    CorruptEntry {
        date: NaiveDate,
        raw: String,
        reason: String,
    },

    /// Backend (SQLite) failure
    #[error(transparent)]
    Backend(#[from] DatabaseError),

    /// Failed to encode an entry for storage
    #[error("Failed to encode entry: {0}")]
    Serialize(String),
}

/// Session state machine errors.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The command is not valid in the current state.
    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: SessionState,
    },

    /// Text was written to a step that is not visible yet.
    #[error("Step {step} is not open yet (current: {state})")]
    StepHidden { step: u8, state: SessionState },

    /// Today's entry is completed and read-only.
    #[error("Today's practice is completed and can no longer be edited")]
    Sealed,

    /// Store failure during a write-through
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Import/export errors.
#[derive(Error, Debug)]
pub enum TransferError {
    /// Nothing to export.
    #[error("Aucune donnée à exporter")]
    EmptyExport,

    /// The import document is not a JSON array of records.
    #[error("Fichier d'import invalide : {0}")]
    InvalidImportDocument(String),

    /// Store failure during import/export
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, _msg) => {
                if code.code == rusqlite::ErrorCode::DatabaseLocked
                    || code.code == rusqlite::ErrorCode::DatabaseBusy
                {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Backend(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
