//! Session state machine for today's entry.
//!
//! The session holds a working copy of one day's entry and writes it through
//! to the store after every mutation. Like the rest of the crate it runs no
//! timers: an automatic advance is recorded as a [`PendingAdvance`] and the
//! caller invokes [`Session::tick`] to let due advances fire.
//!
//! ## State Transitions
//!
//! ```text
//! Drafting(1) -> ... -> Drafting(5) -> Engagement -> Completed <-> Reviewing
//!                                                       |
//!                     Drafting(1) <- reset_for_new_day -+
//! ```

use chrono::{Duration, NaiveDate};

use super::confirm::{ConfirmationRequest, SameDayChoice, SameDayResolution};
use super::state::{
    NewPracticeKind, PendingAdvance, SessionSnapshot, SessionState, StepView, StepVisibility,
};
use crate::clock::Clock;
use crate::entry::{JournalEntry, StepIndex};
use crate::error::{SessionError, StoreError};
use crate::events::SessionEvent;
use crate::storage::{EntryStore, SessionConfig};

type Listener = Box<dyn FnMut(&SessionEvent)>;

/// Upper bound on the configured auto-advance delay (one hour).
const MAX_ADVANCE_DELAY_MS: i64 = 3_600_000;

/// Result of [`Session::start_new_practice`].
#[derive(Debug, Clone, PartialEq)]
pub enum NewPractice {
    /// The practice was completed today; present the request and resolve it.
    ConfirmationRequired(ConfirmationRequest),
    /// A fresh day was started.
    Started(SessionEvent),
}

pub struct Session<S, C> {
    store: S,
    clock: C,
    config: SessionConfig,
    date: NaiveDate,
    entry: JournalEntry,
    state: SessionState,
    pending: Option<PendingAdvance>,
    warnings: Vec<String>,
    listeners: Vec<Listener>,
}

impl<S: EntryStore, C: Clock> Session<S, C> {
    /// Build the session for today from whatever the store holds.
    ///
    /// An unreadable stored value is moved aside and reported through
    /// [`Session::warnings`]; the day then starts empty.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn load(store: S, clock: C, config: SessionConfig) -> Result<Self, SessionError> {
        let date = clock.today();
        let mut session = Self {
            store,
            clock,
            config,
            date,
            entry: JournalEntry::default(),
            state: SessionState::Drafting {
                step: StepIndex::FIRST,
            },
            pending: None,
            warnings: Vec::new(),
            listeners: Vec::new(),
        };
        session.restore()?;
        Ok(session)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Date key of the working entry.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn entry(&self) -> &JournalEntry {
        &self.entry
    }

    pub fn pending_advance(&self) -> Option<PendingAdvance> {
        self.pending
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Label of the "start new" action; `None` until the entry is completed.
    pub fn new_practice_kind(&self) -> Option<NewPracticeKind> {
        let completed_on = self.entry.completion_date()?;
        if completed_on == self.clock.today() {
            Some(NewPracticeKind::SameDay)
        } else {
            Some(NewPracticeKind::Rollover)
        }
    }

    pub fn step_visibility(&self, step: StepIndex) -> StepVisibility {
        match self.state {
            SessionState::Drafting { step: current } if step < current => StepVisibility::Done,
            SessionState::Drafting { step: current } if step == current => StepVisibility::Active,
            SessionState::Drafting { .. } => StepVisibility::Hidden,
            SessionState::Engagement => StepVisibility::Done,
            SessionState::Completed => StepVisibility::Hidden,
            SessionState::Reviewing => StepVisibility::ReadOnly,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            date: self.date,
            state: self.state,
            steps: StepIndex::all()
                .map(|step| StepView {
                    step,
                    text: self.entry.text(step).to_string(),
                    visibility: self.step_visibility(step),
                })
                .collect(),
            committed: self.entry.committed,
            completed_at: self.entry.completed_at,
            new_practice: self.new_practice_kind(),
            pending_advance: self.pending,
            warnings: self.warnings.clone(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Register a callback invoked for every event the session produces.
    pub fn subscribe(&mut self, listener: impl FnMut(&SessionEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Write the text of a visible step and persist it immediately.
    ///
    /// Text longer than the configured threshold in the active step schedules
    /// an automatic advance.
    ///
    /// # Errors
    /// [`SessionError::Sealed`] once the entry is completed,
    /// [`SessionError::StepHidden`] for a step not reached yet.
    pub fn input(&mut self, step: StepIndex, text: &str) -> Result<SessionEvent, SessionError> {
        // Nothing written yet: the entry belongs to the date of its first write.
        if self.entry.is_blank() && self.clock.today() != self.date {
            self.restore()?;
        }

        let current = match self.state {
            SessionState::Drafting { step } => step,
            SessionState::Engagement => StepIndex::LAST,
            SessionState::Completed | SessionState::Reviewing => {
                return Err(SessionError::Sealed)
            }
        };
        if self.entry.is_completed() {
            return Err(SessionError::Sealed);
        }
        if step > current {
            return Err(SessionError::StepHidden {
                step: step.get(),
                state: self.state,
            });
        }

        self.entry.set_step(step, text);
        self.store.put(self.date, &self.entry)?;

        let now = self.clock.now();
        let chars = text.trim().chars().count();
        tracing::debug!(date = %self.date, %step, chars, "step written");
        let event = SessionEvent::StepWritten {
            date: self.date,
            step,
            chars,
            at: now,
        };
        self.emit(&event);

        if step == current
            && matches!(self.state, SessionState::Drafting { .. })
            && chars > self.config.auto_advance_min_chars
        {
            let delay = i64::try_from(self.config.auto_advance_delay_ms)
                .unwrap_or(MAX_ADVANCE_DELAY_MS)
                .min(MAX_ADVANCE_DELAY_MS);
            let pending = PendingAdvance {
                from: step,
                due_at: now + Duration::milliseconds(delay),
            };
            self.pending = Some(pending);
            self.emit(&SessionEvent::AdvanceScheduled {
                from: pending.from,
                due_at: pending.due_at,
            });
        }

        Ok(event)
    }

    /// Fire the pending advance if it is due.
    pub fn tick(&mut self) -> Option<SessionEvent> {
        let pending = self.pending?;
        if self.clock.now() < pending.due_at {
            return None;
        }
        Some(self.fire(pending))
    }

    /// Fire the pending advance now, whatever its due time.
    pub fn fire_pending(&mut self) -> Option<SessionEvent> {
        let pending = self.pending?;
        Some(self.fire(pending))
    }

    /// Record the commitment answer and seal today's entry.
    ///
    /// # Errors
    /// Only valid while awaiting the commitment.
    pub fn complete_journey(&mut self, committed: bool) -> Result<SessionEvent, SessionError> {
        if self.state != SessionState::Engagement {
            return Err(SessionError::InvalidTransition {
                action: "complete the practice",
                state: self.state,
            });
        }

        let at = self.clock.now();
        self.entry.committed = Some(committed);
        self.entry.completed_at = Some(at);
        self.store.put(self.date, &self.entry)?;
        self.pending = None;
        self.state = SessionState::Completed;

        tracing::info!(date = %self.date, committed, "practice completed");
        let event = SessionEvent::JourneyCompleted {
            date: self.date,
            committed,
            at,
        };
        self.emit(&event);
        Ok(event)
    }

    /// Show the sealed entry read-only.
    ///
    /// # Errors
    /// Only valid from `Completed`.
    pub fn review_practice(&mut self) -> Result<SessionEvent, SessionError> {
        if self.state != SessionState::Completed {
            return Err(SessionError::InvalidTransition {
                action: "review the practice",
                state: self.state,
            });
        }
        self.state = SessionState::Reviewing;
        let event = SessionEvent::ReviewStarted {
            date: self.date,
            at: self.clock.now(),
        };
        self.emit(&event);
        Ok(event)
    }

    /// Ask to begin a new practice.
    ///
    /// On the day the practice was completed this only yields a
    /// [`ConfirmationRequest`]; today's entry is never discarded. After a
    /// day rollover the session resets straight away.
    ///
    /// # Errors
    /// Only valid from `Completed` or `Reviewing`.
    pub fn start_new_practice(&mut self) -> Result<NewPractice, SessionError> {
        let kind = match (self.state.is_sealed(), self.new_practice_kind()) {
            (true, Some(kind)) => kind,
            _ => {
                return Err(SessionError::InvalidTransition {
                    action: "start a new practice",
                    state: self.state,
                })
            }
        };

        match kind {
            NewPracticeKind::SameDay => {
                let event = SessionEvent::ConfirmationRequested {
                    date: self.date,
                    at: self.clock.now(),
                };
                self.emit(&event);
                Ok(NewPractice::ConfirmationRequired(ConfirmationRequest::same_day(
                    self.date,
                )))
            }
            NewPracticeKind::Rollover => Ok(NewPractice::Started(self.reset_for_new_day()?)),
        }
    }

    /// Apply the answer to a same-day [`ConfirmationRequest`].
    ///
    /// # Errors
    /// Only valid while the entry is sealed.
    pub fn resolve_same_day(
        &mut self,
        choice: SameDayChoice,
    ) -> Result<SameDayResolution, SessionError> {
        if !self.state.is_sealed() {
            return Err(SessionError::InvalidTransition {
                action: "resolve a same-day confirmation",
                state: self.state,
            });
        }
        match choice {
            SameDayChoice::ViewHistory => Ok(SameDayResolution::ShowHistory),
            SameDayChoice::ReviewPractice => {
                if self.state == SessionState::Completed {
                    self.review_practice()?;
                }
                Ok(SameDayResolution::Review)
            }
        }
    }

    /// Drop the working copy and start over from the store for today.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn reset_for_new_day(&mut self) -> Result<SessionEvent, SessionError> {
        self.entry = JournalEntry::default();
        self.restore()?;
        tracing::info!(date = %self.date, state = %self.state, "new day started");
        let event = SessionEvent::NewDayStarted {
            date: self.date,
            state: self.state,
            at: self.clock.now(),
        };
        self.emit(&event);
        Ok(event)
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Re-read today's entry and derive the state from it.
    fn restore(&mut self) -> Result<(), SessionError> {
        self.date = self.clock.today();
        self.pending = None;
        let entry = match self.store.get(self.date) {
            Ok(entry) => entry.unwrap_or_default(),
            Err(StoreError::CorruptEntry { date, reason, .. }) => {
                self.store.quarantine(date)?;
                tracing::warn!(%date, %reason, "today's entry was unreadable and has been set aside");
                self.warnings
                    .push(format!("L'entrée du {date} était illisible et a été mise de côté."));
                let event = SessionEvent::CorruptEntryQuarantined {
                    date,
                    reason,
                    at: self.clock.now(),
                };
                self.emit(&event);
                JournalEntry::default()
            }
            Err(e) => return Err(e.into()),
        };
        self.state = SessionState::derive(&entry);
        self.entry = entry;
        Ok(())
    }

    fn fire(&mut self, pending: PendingAdvance) -> SessionEvent {
        self.pending = None;
        let at = self.clock.now();
        let still_drafting = self.state
            == SessionState::Drafting {
                step: pending.from,
            };

        let event = if still_drafting && !self.entry.is_completed() {
            let to = match pending.from.next() {
                Some(step) => SessionState::Drafting { step },
                None => SessionState::Engagement,
            };
            self.state = to;
            tracing::debug!(from = %pending.from, to = %to, "advanced to next step");
            SessionEvent::StepAdvanced {
                from: pending.from,
                to,
                at,
            }
        } else {
            SessionEvent::AdvanceSuperseded {
                from: pending.from,
                state: self.state,
                at,
            }
        };
        self.emit(&event);
        event
    }

    fn emit(&mut self, event: &SessionEvent) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }
}
