use std::path::PathBuf;

use clap::Subcommand;
use clarte_core::{
    transfer, Clock, Config, CoreError, Database, EntryStore, ExportDocument, SystemClock,
};

#[derive(Subcommand)]
pub enum TransferAction {
    /// Export every completed practice as JSON
    Export {
        /// Output file (default: clarte_export_<date>.json in the current directory)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Import practices from an export file; existing days are kept
    Import {
        /// JSON export file
        file: PathBuf,
    },
    /// Delete every journal entry
    Wipe {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: TransferAction) -> clarte_core::Result<()> {
    let config = Config::load_or_default();
    let db = Database::open()?;
    let today = SystemClock.today();

    match action {
        TransferAction::Export { output } => {
            let document = transfer::export(&db, today, config.history.horizon_days)?;
            let path = output.unwrap_or_else(|| {
                PathBuf::from(ExportDocument::file_name(&config.export.file_prefix, today))
            });
            std::fs::write(&path, document.to_pretty_json()?)?;
            println!("{} entrée(s) exportée(s) vers {}", document.len(), path.display());
        }
        TransferAction::Import { file } => {
            let json = std::fs::read_to_string(&file)?;
            let summary = transfer::import(&db, &json)?;
            println!("{}", summary.message());
            if summary.skipped_existing > 0 {
                println!("{} jour(s) déjà présent(s) conservé(s)", summary.skipped_existing);
            }
            if summary.skipped_incomplete > 0 {
                println!("{} entrée(s) incomplète(s) ignorée(s)", summary.skipped_incomplete);
            }
        }
        TransferAction::Wipe { yes } => {
            if !yes {
                return Err(CoreError::Custom(
                    "refusing to delete all entries without --yes".to_string(),
                ));
            }
            let deleted = db.delete_all()?;
            println!("{deleted} entrée(s) supprimée(s)");
        }
    }
    Ok(())
}
