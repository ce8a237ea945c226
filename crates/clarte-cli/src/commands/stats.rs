use clarte_core::{Config, Database, InsightsAnalyzer};

use super::completed_entries;

pub fn run(json: bool) -> clarte_core::Result<()> {
    let config = Config::load_or_default();
    let db = Database::open()?;
    let entries = completed_entries(&db, &config)?;
    let stats = InsightsAnalyzer::new(config.insights).practice_stats(&entries);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("Pratiques : {}", stats.practice_count);
        println!("Engagements : {}", stats.committed_count);
    }
    Ok(())
}
