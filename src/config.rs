/// User configuration: `config.toml` in the platform config directory plus environment overrides.
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::entry::DEFAULT_ENTRY_TYPE;

pub const ENV_DB: &str = "DEVJOURNAL_DB";
pub const ENV_TRACKER_URL: &str = "DEVJOURNAL_TRACKER_URL";
pub const ENV_TRACKER_URL_FALLBACK: &str = "JIRA_BASE_URL";
pub const ENV_LOG: &str = "DEVJOURNAL_LOG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalConfig {
    /// SQLite file; the platform data directory when unset.
    #[serde(default)]
    pub db_path: Option<String>,
    /// Issue tracker base URL, e.g. "https://jira.example.com". Ticket links are `<base>/browse/<KEY>`.
    #[serde(default)]
    pub tracker_base_url: Option<String>,
    #[serde(default = "default_entry_type")]
    pub default_entry_type: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_entry_type() -> String {
    DEFAULT_ENTRY_TYPE.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            tracker_base_url: None,
            default_entry_type: default_entry_type(),
            log_level: default_log_level(),
        }
    }
}

impl JournalConfig {
    pub fn config_path() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Cannot determine config directory")?
            .join("devjournal")
            .join("config.toml"))
    }

    /// Load config from disk and apply environment overrides.
    /// Returns the default config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config at {}", path.display()))?;
            Self::parse(&raw).with_context(|| format!("Failed to parse config at {}", path.display()))?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)?;
        std::fs::write(&path, raw)?;
        Ok(())
    }

    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        let set = |key: &str| var(key).filter(|value| !value.trim().is_empty());
        if let Some(db) = set(ENV_DB) {
            self.db_path = Some(db);
        }
        if let Some(url) = set(ENV_TRACKER_URL).or_else(|| set(ENV_TRACKER_URL_FALLBACK)) {
            self.tracker_base_url = Some(url);
        }
        if let Some(level) = set(ENV_LOG) {
            self.log_level = level;
        }
    }

    pub fn db_path(&self) -> String {
        self.db_path.clone().unwrap_or_else(crate::db::default_db_path)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{ENV_DB, ENV_LOG, ENV_TRACKER_URL, ENV_TRACKER_URL_FALLBACK, JournalConfig};

    #[test]
    fn missing_keys_use_defaults() {
        let config = JournalConfig::parse("db_path = \"/tmp/j.db\"").expect("parse");

        assert_eq!(config.db_path.as_deref(), Some("/tmp/j.db"));
        assert_eq!(config.default_entry_type, "development");
        assert_eq!(config.log_level, "info");
        assert_eq!(JournalConfig::parse("").expect("parse empty"), JournalConfig::default());
    }

    #[test]
    fn environment_overrides_file() {
        let env = HashMap::from([
            (ENV_DB, "/data/alt.db"),
            (ENV_TRACKER_URL_FALLBACK, "https://jira.example.com"),
            (ENV_LOG, "debug"),
        ]);
        let mut config = JournalConfig::default();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.db_path(), "/data/alt.db");
        assert_eq!(config.tracker_base_url.as_deref(), Some("https://jira.example.com"));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn dedicated_tracker_variable_wins() {
        let env = HashMap::from([
            (ENV_TRACKER_URL, "https://tracker.example.com"),
            (ENV_TRACKER_URL_FALLBACK, "https://jira.example.com"),
        ]);
        let mut config = JournalConfig::default();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.tracker_base_url.as_deref(), Some("https://tracker.example.com"));
    }

    #[test]
    fn rejects_malformed_files() {
        assert!(JournalConfig::parse("log_level = [").is_err());
    }
}
