use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::entry::{JournalEntry, StepIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    /// Writing step `step`; earlier steps are done, later ones hidden.
    Drafting { step: StepIndex },
    /// All five steps written; waiting for the yes/no commitment.
    Engagement,
    /// Today's entry is sealed; completion summary shown.
    Completed,
    /// Sealed entry shown read-only.
    Reviewing,
}

impl SessionState {
    /// State implied by a stored entry.
    pub fn derive(entry: &JournalEntry) -> Self {
        if entry.is_completed() {
            return SessionState::Completed;
        }
        match StepIndex::new(entry.highest_filled_step() + 1) {
            Some(step) => SessionState::Drafting { step },
            None => SessionState::Engagement,
        }
    }

    pub fn is_sealed(self) -> bool {
        matches!(self, SessionState::Completed | SessionState::Reviewing)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Drafting { step } => write!(f, "drafting step {step}"),
            SessionState::Engagement => f.write_str("awaiting commitment"),
            SessionState::Completed => f.write_str("completed"),
            SessionState::Reviewing => f.write_str("reviewing"),
        }
    }
}

/// How a step is presented in the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepVisibility {
    Hidden,
    Active,
    Done,
    ReadOnly,
}

/// Which path "start a new practice" takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewPracticeKind {
    /// Completed today: guarded by a confirmation.
    SameDay,
    /// Completed on an earlier day: resets straight away.
    Rollover,
}

/// A scheduled automatic advance out of `from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAdvance {
    pub from: StepIndex,
    pub due_at: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepView {
    pub step: StepIndex,
    pub text: String,
    pub visibility: StepVisibility,
}

/// Everything a front end needs to draw the journey view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub state: SessionState,
    pub steps: Vec<StepView>,
    pub committed: Option<bool>,
    pub completed_at: Option<DateTime<FixedOffset>>,
    pub new_practice: Option<NewPracticeKind>,
    pub pending_advance: Option<PendingAdvance>,
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_from_blank_entry() {
        assert_eq!(
            SessionState::derive(&JournalEntry::default()),
            SessionState::Drafting { step: StepIndex::FIRST }
        );
    }

    #[test]
    fn derive_skips_to_after_highest_filled_step() {
        let mut entry = JournalEntry::default();
        entry.set_step(StepIndex::VISION, "clarté");
        assert_eq!(
            SessionState::derive(&entry),
            SessionState::Drafting { step: StepIndex::OBSTACLE }
        );
    }

    #[test]
    fn derive_engagement_when_all_steps_filled() {
        let mut entry = JournalEntry::default();
        for step in StepIndex::all() {
            entry.set_step(step, "texte");
        }
        assert_eq!(SessionState::derive(&entry), SessionState::Engagement);
    }

    #[test]
    fn state_serializes_with_tag() {
        let json = serde_json::to_value(SessionState::Drafting { step: StepIndex::VISION }).unwrap();
        assert_eq!(json["state"], "drafting");
        assert_eq!(json["step"], 2);
    }
}
