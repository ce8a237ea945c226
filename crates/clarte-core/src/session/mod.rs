//! Guided five-step flow for today's entry.

mod confirm;
mod machine;
mod state;

pub use confirm::{ConfirmationOption, ConfirmationRequest, SameDayChoice, SameDayResolution};
pub use machine::{NewPractice, Session};
pub use state::{
    NewPracticeKind, PendingAdvance, SessionSnapshot, SessionState, StepView, StepVisibility,
};
