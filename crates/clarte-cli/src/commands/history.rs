use clarte_core::history::EMPTY_HISTORY_MESSAGE;
use clarte_core::{recent_history, Config, Database, HistoryItem};

use super::completed_entries;

pub fn run(limit: Option<usize>, json: bool) -> clarte_core::Result<()> {
    let mut config = Config::load_or_default();
    if let Some(limit) = limit {
        config.history.list_limit = limit;
    }
    let db = Database::open()?;
    let entries = completed_entries(&db, &config)?;
    let items = recent_history(&entries, &config.history);

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        print(&items);
    }
    Ok(())
}

pub(crate) fn print(items: &[HistoryItem]) {
    if items.is_empty() {
        println!("{EMPTY_HISTORY_MESSAGE}");
        return;
    }
    for item in items {
        println!("{}", item.date_label);
        println!("  {}", item.vision);
        println!("  {}", item.action_line());
    }
}
