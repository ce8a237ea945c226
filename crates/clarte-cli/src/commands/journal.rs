use clap::{Subcommand, ValueEnum};
use clarte_core::session::{SameDayResolution, StepVisibility};
use clarte_core::{
    recent_history, Config, CoreError, Database, NewPractice, SameDayChoice, Session,
    SessionEvent, SessionSnapshot, SessionState, StepIndex, SystemClock,
};

use super::completed_entries;

#[derive(Clone, Copy, ValueEnum)]
pub enum Answer {
    #[value(alias = "oui")]
    Yes,
    #[value(alias = "non")]
    No,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ChoiceArg {
    History,
    Review,
}

impl From<ChoiceArg> for SameDayChoice {
    fn from(choice: ChoiceArg) -> Self {
        match choice {
            ChoiceArg::History => SameDayChoice::ViewHistory,
            ChoiceArg::Review => SameDayChoice::ReviewPractice,
        }
    }
}

#[derive(Subcommand)]
pub enum JournalAction {
    /// Show today's practice
    Today {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Write the answer to a step
    Write {
        /// Step number (1-5)
        #[arg(value_parser = clap::value_parser!(u8).range(1..=5))]
        step: u8,
        /// Answer text
        text: String,
    },
    /// Answer the commitment question and complete today's practice
    Complete {
        #[arg(value_enum)]
        answer: Answer,
    },
    /// Show the completed practice read-only
    Review,
    /// Start a new practice
    New {
        /// Answer to the same-day confirmation
        #[arg(long, value_enum)]
        choice: Option<ChoiceArg>,
    },
}

pub fn run(action: JournalAction) -> clarte_core::Result<()> {
    let config = Config::load_or_default();
    let db = Database::open()?;
    let mut session = Session::load(&db, SystemClock, config.session.clone())?;
    for warning in session.warnings() {
        eprintln!("warning: {warning}");
    }

    match action {
        JournalAction::Today { json } => {
            let snapshot = session.snapshot();
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                print_snapshot(&snapshot);
            }
        }
        JournalAction::Write { step, text } => {
            let step = StepIndex::new(step).ok_or_else(|| {
                CoreError::Custom(format!("step must be between 1 and 5, got {step}"))
            })?;
            session.input(step, &text)?;
            // No process stays around to wait out the delay.
            if let Some(SessionEvent::StepAdvanced { to, .. }) = session.fire_pending() {
                tracing::debug!(%to, "advanced after write");
            }
            print_snapshot(&session.snapshot());
        }
        JournalAction::Complete { answer } => {
            session.complete_journey(matches!(answer, Answer::Yes))?;
            println!("Pratique complétée.");
            print_snapshot(&session.snapshot());
        }
        JournalAction::Review => {
            session.review_practice()?;
            print_snapshot(&session.snapshot());
        }
        JournalAction::New { choice } => match session.start_new_practice()? {
            NewPractice::Started(_) => {
                println!("Nouvelle pratique commencée pour le {}.", session.date());
                print_snapshot(&session.snapshot());
            }
            NewPractice::ConfirmationRequired(request) => {
                let Some(choice) = choice else {
                    println!("{}", request.title);
                    println!("{}", request.message);
                    for option in &request.options {
                        let flag = match option.choice {
                            SameDayChoice::ViewHistory => "history",
                            SameDayChoice::ReviewPractice => "review",
                        };
                        println!("  --choice {flag:<8} {}", option.label);
                    }
                    return Ok(());
                };
                match session.resolve_same_day(choice.into())? {
                    SameDayResolution::ShowHistory => {
                        let entries = completed_entries(&db, &config)?;
                        super::history::print(&recent_history(&entries, &config.history));
                    }
                    SameDayResolution::Review => print_snapshot(&session.snapshot()),
                }
            }
        },
    }
    Ok(())
}

fn print_snapshot(snapshot: &SessionSnapshot) {
    println!("Pratique du {} ({})", snapshot.date, snapshot.state);
    for view in &snapshot.steps {
        let marker = match view.visibility {
            StepVisibility::Hidden => continue,
            StepVisibility::Active => '›',
            StepVisibility::Done => '✓',
            StepVisibility::ReadOnly => '·',
        };
        println!("  {marker} {}. {}", view.step, view.text);
    }
    if let Some(pending) = snapshot.pending_advance {
        println!("  (passage automatique après l'étape {})", pending.from);
    }
    match snapshot.state {
        SessionState::Engagement => {
            println!("Vous engagez-vous à faire ce micro-pas ? (clarte complete yes|no)");
        }
        SessionState::Completed | SessionState::Reviewing => {
            let committed = if snapshot.committed == Some(true) {
                "✓ Action engagée"
            } else {
                "○ Pratique complétée"
            };
            println!("{committed}");
        }
        SessionState::Drafting { .. } => {}
    }
}
