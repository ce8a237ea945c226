use clap::Subcommand;
use clarte_core::{Config, CoreError};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one setting
    Get {
        /// Dotted key, e.g. "history.list_limit" or "insights.window_days"
        key: String,
    },
    /// Change one setting; day ranges are checked before saving
    Set {
        key: String,
        value: String,
    },
    /// Print every setting as `section.key = value`
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Restore the default settings
    Reset,
}

pub fn run(action: ConfigAction) -> clarte_core::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let value = Config::load()?
                .get(&key)
                .ok_or_else(|| CoreError::Custom(format!("unknown key: {key}")))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            let previous = config.get(&key);
            config.set(&key, &value)?;
            tracing::debug!(%key, ?previous, %value, "setting changed");
            println!("{key} = {}", config.get(&key).unwrap_or(value));
        }
        ConfigAction::List { json } => {
            let config = Config::load()?;
            let tree = serde_json::to_value(&config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tree)?);
                return Ok(());
            }
            let Some(sections) = tree.as_object() else {
                return Ok(());
            };
            for (section, fields) in sections {
                let Some(fields) = fields.as_object() else {
                    continue;
                };
                for field in fields.keys() {
                    let key = format!("{section}.{field}");
                    if let Some(value) = config.get(&key) {
                        println!("{key} = {value}");
                    }
                }
            }
        }
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("settings restored to defaults");
        }
    }
    Ok(())
}
