//! Integration tests for the daily journal.
//!
//! Drives a full day through the session against the SQLite store, then
//! checks history, insights and the export/import round trip.

use chrono::{Duration, NaiveDate};
use clarte_core::insights::ConstancyBand;
use clarte_core::session::SameDayResolution;
use clarte_core::storage::{HistoryConfig, SessionConfig};
use clarte_core::{
    recent_history, transfer, Database, EntryStore, FixedClock, InsightsAnalyzer, JournalEntry,
    NewPractice, SameDayChoice, Session, SessionState, StepIndex, TransferError,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn completed_entry(committed: bool) -> JournalEntry {
    let mut entry = JournalEntry {
        committed: Some(committed),
        completed_at: clarte_core::entry::parse_date_key("2024-03-01")
            .map(|d| d.and_hms_opt(20, 0, 0).unwrap().and_utc().fixed_offset()),
        ..Default::default()
    };
    for step in StepIndex::all() {
        entry.set_step(step, format!("réponse numéro {}", step.get()));
    }
    entry
}

#[test]
fn test_full_day_through_sqlite() {
    let db = Database::open_memory().unwrap();
    let clock = FixedClock::at("2024-03-01T08:00:00+01:00");
    let mut session = Session::load(&db, &clock, SessionConfig::default()).unwrap();

    let answers = [
        "Je me sens calme ce matin",
        "Terminer le chapitre sereinement",
        "La fatigue de fin de journée",
        "Avancer malgré la fatigue",
        "Écrire deux pages avant midi",
    ];
    for (step, text) in StepIndex::all().zip(answers) {
        session.input(step, text).unwrap();
        // write-through: the store holds every step written so far
        let stored = db.get(session.date()).unwrap().unwrap();
        assert_eq!(stored.text(step), text);
        clock.advance(Duration::milliseconds(500));
        session.tick().unwrap();
    }
    assert_eq!(session.state(), SessionState::Engagement);

    session.complete_journey(true).unwrap();
    assert_eq!(session.state(), SessionState::Completed);

    let entries = db.list_completed(date(2024, 3, 1), 365).unwrap();
    assert_eq!(entries.len(), 1);
    let stats = InsightsAnalyzer::default().practice_stats(&entries);
    assert_eq!((stats.practice_count, stats.committed_count), (1, 1));

    let history = recent_history(&entries, &HistoryConfig::default());
    assert_eq!(history[0].date_label, "vendredi 1 mars 2024");
    assert_eq!(history[0].vision, answers[1]);
}

#[test]
fn test_same_day_restart_never_discards_entry() {
    let db = Database::open_memory().unwrap();
    db.put(date(2024, 3, 1), &completed_entry(true)).unwrap();
    let clock = FixedClock::at("2024-03-01T21:00:00+00:00");
    let mut session = Session::load(&db, &clock, SessionConfig::default()).unwrap();

    let NewPractice::ConfirmationRequired(request) = session.start_new_practice().unwrap() else {
        panic!("same-day restart must ask for confirmation");
    };
    assert_eq!(request.options.len(), 2);
    assert_eq!(
        session.resolve_same_day(SameDayChoice::ReviewPractice).unwrap(),
        SameDayResolution::Review
    );
    assert_eq!(session.state(), SessionState::Reviewing);
    assert!(db.get(date(2024, 3, 1)).unwrap().unwrap().is_completed());
}

#[test]
fn test_rollover_starts_fresh_day() {
    let db = Database::open_memory().unwrap();
    db.put(date(2024, 3, 1), &completed_entry(false)).unwrap();
    let clock = FixedClock::at("2024-03-01T21:00:00+00:00");
    let mut session = Session::load(&db, &clock, SessionConfig::default()).unwrap();

    clock.advance(Duration::days(1));
    assert!(matches!(
        session.start_new_practice().unwrap(),
        NewPractice::Started(_)
    ));
    assert_eq!(session.date(), date(2024, 3, 2));
    assert_eq!(
        session.state(),
        SessionState::Drafting {
            step: StepIndex::FIRST
        }
    );
    assert!(db.get(date(2024, 3, 1)).unwrap().is_some());
}

#[test]
fn test_thirty_days_with_twenty_commitments_is_top_band() {
    let db = Database::open_memory().unwrap();
    let today = date(2024, 3, 30);
    for i in 0..30 {
        db.put(today - Duration::days(i), &completed_entry(i < 20))
            .unwrap();
    }
    let report = InsightsAnalyzer::default()
        .report_from_store(&db, today, 365)
        .unwrap();
    assert_eq!(report.stats.practice_count, 30);
    assert_eq!(report.stats.committed_count, 20);
    assert_eq!(report.constancy.band, ConstancyBand::Remarkable);
}

#[test]
fn test_export_import_round_trip_is_idempotent() {
    let source = Database::open_memory().unwrap();
    let today = date(2024, 3, 10);
    for i in 0..5 {
        source.put(today - Duration::days(i), &completed_entry(true)).unwrap();
    }
    let json = transfer::export(&source, today, 365)
        .unwrap()
        .to_pretty_json()
        .unwrap();

    let target = Database::open_memory().unwrap();
    let first = transfer::import(&target, &json).unwrap();
    assert_eq!(first.imported, 5);

    let second = transfer::import(&target, &json).unwrap();
    assert_eq!(second.imported, 0);
    assert_eq!(second.skipped_existing, 5);
    assert_eq!(
        target.list_completed(today, 365).unwrap(),
        source.list_completed(today, 365).unwrap()
    );
}

#[test]
fn test_import_collision_keeps_existing_record() {
    let db = Database::open_memory().unwrap();
    let mine = completed_entry(false);
    db.put(date(2024, 3, 1), &mine).unwrap();

    let json = r#"[{"date":"2024-03-01","step2":"autre chose","committed":true,"completedAt":"2024-03-01T20:00:00"}]"#;
    let summary = transfer::import(&db, json).unwrap();
    assert_eq!(summary.imported, 0);
    assert_eq!(db.get(date(2024, 3, 1)).unwrap().unwrap(), mine);
}

#[test]
fn test_empty_store_export_is_refused() {
    let db = Database::open_memory().unwrap();
    let err = transfer::export(&db, date(2024, 3, 10), 365).unwrap_err();
    assert!(matches!(err, TransferError::EmptyExport));
    assert_eq!(err.to_string(), "Aucune donnée à exporter");
}

#[test]
fn test_corrupt_entry_is_skipped_by_history_scan() {
    let db = Database::open_memory().unwrap();
    let today = date(2024, 3, 10);
    db.put(today, &completed_entry(true)).unwrap();
    db.kv_set("journey_2024-03-09", "{not json").unwrap();

    let entries = db.list_completed(today, 365).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].date, today);
}

#[test]
fn test_oversized_insight_window_is_rejected_by_config() -> clarte_core::Result<()> {
    let db = Database::open_memory()?;
    let today = date(2024, 3, 10);
    db.put(today, &completed_entry(true))?;

    let mut config = clarte_core::Config::default();
    assert!(config.apply("insights.window_days", "4294967295").is_err());

    let report = InsightsAnalyzer::new(config.insights).report_from_store(&db, today, 365)?;
    assert_eq!(report.constancy.count, 1);
    assert_eq!(report.activity.cells.len(), 30);
    Ok(())
}
