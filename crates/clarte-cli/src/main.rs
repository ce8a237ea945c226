use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "clarte", version, about = "Clarté, journal de réflexion quotidien")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Journal(commands::journal::JournalAction),
    /// Practice and commitment counts
    Stats {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Patterns across the completed history
    Insights {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Recent completed practices, newest first
    History {
        /// Number of practices to list (default from config)
        #[arg(long)]
        limit: Option<usize>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    #[command(flatten)]
    Transfer(commands::transfer::TransferAction),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

/// Log to stderr, filtered by `CLARTE_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("CLARTE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Journal(action) => commands::journal::run(action),
        Commands::Stats { json } => commands::stats::run(json),
        Commands::Insights { json } => commands::insights::run(json),
        Commands::History { limit, json } => commands::history::run(limit, json),
        Commands::Transfer(action) => commands::transfer::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
