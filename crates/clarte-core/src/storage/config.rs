//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Auto-advance behavior of the guided flow
//! - History scan horizon and excerpt lengths
//! - Insight thresholds
//! - Export file naming
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{data_dir, MAX_HORIZON_DAYS};
use crate::error::ConfigError;

/// Guided flow configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Delay before moving on to the next step.
    #[serde(default = "default_auto_advance_delay_ms")]
    pub auto_advance_delay_ms: u64,
    /// Trimmed text must be longer than this to schedule an advance.
    #[serde(default = "default_auto_advance_min_chars")]
    pub auto_advance_min_chars: usize,
}

/// History listing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,
    #[serde(default = "default_list_limit")]
    pub list_limit: usize,
    #[serde(default = "default_vision_excerpt_chars")]
    pub vision_excerpt_chars: usize,
    #[serde(default = "default_action_excerpt_chars")]
    pub action_excerpt_chars: usize,
}

/// Thresholds used by the insights analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightsConfig {
    /// Trailing window for constancy and the activity grid.
    #[serde(default = "default_window_days")]
    pub window_days: u32,
    /// Shortest token counted as a recurring word.
    #[serde(default = "default_min_token_chars")]
    pub min_token_chars: usize,
    #[serde(default = "default_top_items")]
    pub top_items: usize,
    /// Weekdays seen fewer times are left out of the power-day ranking.
    #[serde(default = "default_min_weekday_samples")]
    pub min_weekday_samples: u32,
    /// Entries compared at each end of the history.
    #[serde(default = "default_trend_window")]
    pub trend_window: usize,
    #[serde(default = "default_detail_growth_ratio")]
    pub detail_growth_ratio: f64,
}

/// Export file configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub insights: InsightsConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

// Default functions
fn default_auto_advance_delay_ms() -> u64 {
    500
}
fn default_auto_advance_min_chars() -> usize {
    10
}
fn default_horizon_days() -> u32 {
    super::DEFAULT_HORIZON_DAYS
}
fn default_list_limit() -> usize {
    30
}
fn default_vision_excerpt_chars() -> usize {
    100
}
fn default_action_excerpt_chars() -> usize {
    60
}
fn default_window_days() -> u32 {
    30
}
fn default_min_token_chars() -> usize {
    5
}
fn default_top_items() -> usize {
    3
}
fn default_min_weekday_samples() -> u32 {
    2
}
fn default_trend_window() -> usize {
    7
}
fn default_detail_growth_ratio() -> f64 {
    1.2
}
fn default_file_prefix() -> String {
    "clarte_export".into()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            auto_advance_delay_ms: default_auto_advance_delay_ms(),
            auto_advance_min_chars: default_auto_advance_min_chars(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            horizon_days: default_horizon_days(),
            list_limit: default_list_limit(),
            vision_excerpt_chars: default_vision_excerpt_chars(),
            action_excerpt_chars: default_action_excerpt_chars(),
        }
    }
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            min_token_chars: default_min_token_chars(),
            top_items: default_top_items(),
            min_weekday_samples: default_min_weekday_samples(),
            trend_window: default_trend_window(),
            detail_growth_ratio: default_detail_growth_ratio(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_prefix: default_file_prefix(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let unknown = || invalid("unknown config key".to_string());

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(invalid("config key is empty".to_string()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) => return Err(unknown()),
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk or create the default file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Self::from_toml(&content),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let cfg: Self =
            toml::from_str(content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check the day ranges that drive history scans and insight windows.
    ///
    /// `history.horizon_days` must be in `1..=365` and `insights.window_days`
    /// in `1..=history.horizon_days`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let horizon = self.history.horizon_days;
        if !(1..=MAX_HORIZON_DAYS).contains(&horizon) {
            return Err(ConfigError::InvalidValue {
                key: "history.horizon_days".to_string(),
                message: format!("must be between 1 and {MAX_HORIZON_DAYS}, got {horizon}"),
            });
        }
        let window = self.insights.window_days;
        if !(1..=horizon).contains(&window) {
            return Err(ConfigError::InvalidValue {
                key: "insights.window_days".to_string(),
                message: format!("must be between 1 and {horizon}, got {window}"),
            });
        }
        Ok(())
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.clone(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(&path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the result fails [`Config::validate`].
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "using default configuration");
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed = Config::from_toml(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg = Config::from_toml("[session]\nauto_advance_delay_ms = 0\n").unwrap();
        assert_eq!(cfg.session.auto_advance_delay_ms, 0);
        assert_eq!(cfg.session.auto_advance_min_chars, 10);
        assert_eq!(cfg.history.horizon_days, 365);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("session.auto_advance_delay_ms").as_deref(), Some("500"));
        assert_eq!(cfg.get("export.file_prefix").as_deref(), Some("clarte_export"));
        assert!(cfg.get("session.missing_key").is_none());
    }

    #[test]
    fn apply_updates_nested_number() {
        let mut cfg = Config::default();
        cfg.apply("insights.top_items", "5").unwrap();
        assert_eq!(cfg.insights.top_items, 5);
    }

    #[test]
    fn apply_updates_float() {
        let mut cfg = Config::default();
        cfg.apply("insights.detail_growth_ratio", "1.5").unwrap();
        assert!((cfg.insights.detail_growth_ratio - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn apply_updates_string() {
        let mut cfg = Config::default();
        cfg.apply("export.file_prefix", "journal").unwrap();
        assert_eq!(cfg.export.file_prefix, "journal");
    }

    #[test]
    fn apply_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(cfg.apply("session.nonexistent_key", "1").is_err());
        assert!(cfg.apply("session", "1").is_err());
        assert!(cfg.apply("", "1").is_err());
    }

    #[test]
    fn apply_rejects_invalid_number() {
        let mut cfg = Config::default();
        let result = cfg.apply("history.horizon_days", "many");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        assert_eq!(cfg.history.horizon_days, 365);
    }

    #[test]
    fn apply_rejects_negative_for_unsigned() {
        let mut cfg = Config::default();
        assert!(cfg.apply("history.list_limit", "-3").is_err());
    }

    #[test]
    fn apply_rejects_out_of_range_windows() {
        let mut cfg = Config::default();
        let result = cfg.apply("insights.window_days", "4294967295");
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { ref key, .. }) if key == "insights.window_days"
        ));
        assert_eq!(cfg.insights.window_days, 30);

        assert!(cfg.apply("insights.window_days", "0").is_err());
        assert!(cfg.apply("history.horizon_days", "0").is_err());
        assert!(cfg.apply("history.horizon_days", "366").is_err());
        // The window may not reach past the horizon.
        assert!(cfg.apply("history.horizon_days", "20").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn apply_accepts_window_up_to_horizon() {
        let mut cfg = Config::default();
        cfg.apply("history.horizon_days", "90").unwrap();
        cfg.apply("insights.window_days", "90").unwrap();
        assert_eq!(cfg.insights.window_days, 90);
        assert!(cfg.apply("insights.window_days", "91").is_err());
    }

    #[test]
    fn from_toml_rejects_out_of_range_horizon() {
        let result = Config::from_toml("[history]\nhorizon_days = 100000\n");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }
}
