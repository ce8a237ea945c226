use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::entry::StepIndex;
use crate::session::SessionState;

/// Every state change of a [`crate::Session`] produces an event.
/// Front ends subscribe to them instead of reading session internals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    /// Step text written through to the store.
    StepWritten {
        date: NaiveDate,
        step: StepIndex,
        chars: usize,
        at: DateTime<FixedOffset>,
    },
    /// An automatic move to the next step is due at `due_at`.
    AdvanceScheduled {
        from: StepIndex,
        due_at: DateTime<FixedOffset>,
    },
    StepAdvanced {
        from: StepIndex,
        to: SessionState,
        at: DateTime<FixedOffset>,
    },
    /// A scheduled advance fired after the session had already moved on.
    AdvanceSuperseded {
        from: StepIndex,
        state: SessionState,
        at: DateTime<FixedOffset>,
    },
    JourneyCompleted {
        date: NaiveDate,
        committed: bool,
        at: DateTime<FixedOffset>,
    },
    ReviewStarted {
        date: NaiveDate,
        at: DateTime<FixedOffset>,
    },
    /// Same-day restart asked for; the front end must present the choices.
    ConfirmationRequested {
        date: NaiveDate,
        at: DateTime<FixedOffset>,
    },
    NewDayStarted {
        date: NaiveDate,
        state: SessionState,
        at: DateTime<FixedOffset>,
    },
    /// Today's stored value was unreadable and has been moved aside.
    CorruptEntryQuarantined {
        date: NaiveDate,
        reason: String,
        at: DateTime<FixedOffset>,
    },
}
