//! # Clarté Core Library
//!
//! Core logic for Clarté, a daily reflection journal: a guided five-step prompt
//! recorded once per calendar day, kept locally, and summarized through
//! statistics and pattern insights. The `clarte` CLI is a thin layer over this
//! crate.
//!
//! ## Architecture
//!
//! - **Entry Store**: one JSON entry per date key in SQLite, behind the
//!   [`EntryStore`] trait (with an in-memory store for tests)
//! - **Session**: state machine driving today's entry from blank to completed
//!   to reviewable; the caller invokes `tick()` to fire pending auto-advances
//! - **Insights**: pure functions over the completed history
//! - **Transfer**: JSON export and non-overwriting import
//!
//! ## Key Components
//!
//! - [`Session`]: guided flow for today's entry
//! - [`Database`]: SQLite entry persistence
//! - [`InsightsAnalyzer`]: statistics and patterns
//! - [`Config`]: application configuration management

pub mod clock;
pub mod entry;
pub mod error;
pub mod events;
pub mod history;
pub mod insights;
pub mod session;
pub mod storage;
pub mod transfer;

pub use clock::{Clock, FixedClock, SystemClock};
pub use entry::{DatedEntry, JournalEntry, StepIndex};
pub use error::{
    ConfigError, CoreError, DatabaseError, Result, SessionError, StoreError, TransferError,
};
pub use events::SessionEvent;
pub use history::{recent_history, HistoryItem};
pub use insights::{InsightsAnalyzer, InsightsReport, PracticeStats};
pub use session::{NewPractice, SameDayChoice, Session, SessionSnapshot, SessionState};
pub use storage::{Config, Database, EntryStore, MemoryStore};
pub use transfer::{ExportDocument, ImportSummary};
