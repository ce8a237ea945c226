use clarte_core::insights::{RecurringItems, WEEKDAY_LABELS};
use clarte_core::{Clock, Config, Database, InsightsAnalyzer, InsightsReport, SystemClock};

use super::completed_entries;

pub fn run(json: bool) -> clarte_core::Result<()> {
    let config = Config::load_or_default();
    let db = Database::open()?;
    let entries = completed_entries(&db, &config)?;
    let report = InsightsAnalyzer::new(config.insights).report(&entries, SystemClock.today());

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &InsightsReport) {
    println!(
        "Pratiques : {}   Engagements : {}",
        report.stats.practice_count, report.stats.committed_count
    );
    println!();

    println!("Constance : {}", report.constancy.ratio_label());
    println!("  {}", report.constancy.message);
    println!();

    println!("  {}", WEEKDAY_LABELS.join("  "));
    for row in report.activity.rows() {
        let cells: Vec<String> = row
            .iter()
            .map(|slot| match slot {
                Some(cell) => cell.state.symbol().to_string(),
                None => " ".to_string(),
            })
            .collect();
        println!("  {}", cells.join("  "));
    }
    println!();

    print_items("Visions récurrentes", &report.visions);
    print_items("Obstacles fréquents", &report.obstacles);
    print_items("Actions récurrentes", &report.actions);

    println!("Jours de puissance");
    println!("  {}", report.power_days.message);
    println!();

    println!("Évolution");
    println!("  {}", report.evolution.message);
}

fn print_items(title: &str, items: &RecurringItems) {
    println!("{title}");
    match &items.message {
        Some(message) => println!("  {message}"),
        None => {
            for item in &items.items {
                println!("  {} ({})", item.label, item.count);
            }
        }
    }
    println!();
}
