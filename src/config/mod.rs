use crate::flow::OperationPlan;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Theme name ("dark" or "light")
    pub theme: String,

    /// Delay between simulated-progress ticks in milliseconds;
    /// 0 makes operations complete synchronously
    pub progress_interval_ms: u64,

    /// Progress added per tick, in percent
    pub progress_increment: u16,

    /// Pause between reaching 100% and the completion step, in milliseconds
    pub progress_settle_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            progress_interval_ms: 200,
            progress_increment: 10,
            progress_settle_ms: 500,
        }
    }
}

impl Config {
    /// Load configuration: a `regdesk.json` file if one exists, then
    /// environment variable overrides on top.
    pub fn load() -> Self {
        let mut config = Self::load_from_file().unwrap_or_default();
        config.apply_env_overrides();
        debug!(?config, "configuration loaded");
        config
    }

    /// Load configuration from regdesk.json files.
    ///
    /// Priority:
    /// 1. ./.regdesk.json
    /// 2. ./regdesk.json
    fn load_from_file() -> Option<Self> {
        let config_paths = [
            PathBuf::from("./.regdesk.json"),
            PathBuf::from("./regdesk.json"),
        ];

        for path in config_paths {
            if !path.exists() {
                continue;
            }
            debug!("Loading configuration from: {}", path.display());
            match std::fs::read_to_string(&path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return Some(config),
                    Err(e) => warn!("Invalid config file {}: {}", path.display(), e),
                },
                Err(e) => warn!("Cannot read config file {}: {}", path.display(), e),
            }
        }
        None
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(theme) = std::env::var("REGDESK_THEME") {
            self.theme = theme;
        }
        self.progress_interval_ms =
            env_parse("REGDESK_PROGRESS_INTERVAL_MS", self.progress_interval_ms);
        self.progress_increment =
            env_parse("REGDESK_PROGRESS_INCREMENT", self.progress_increment);
        self.progress_settle_ms =
            env_parse("REGDESK_PROGRESS_SETTLE_MS", self.progress_settle_ms);
    }

    pub fn validate(&self) -> Result<()> {
        if self.progress_increment == 0 || self.progress_increment > 100 {
            anyhow::bail!(
                "progress increment must be between 1 and 100, got {}",
                self.progress_increment
            );
        }
        Ok(())
    }

    /// The operation plan the orchestrator hands to its runner.
    pub fn operation_plan(&self) -> OperationPlan {
        OperationPlan {
            increment: self.progress_increment,
            interval: Duration::from_millis(self.progress_interval_ms),
            settle: Duration::from_millis(self.progress_settle_ms),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.operation_plan().increment, 10);
    }

    #[test]
    fn test_partial_config_file_keeps_defaults() {
        let config: Config = serde_json::from_str(r#"{"theme": "light"}"#).unwrap();
        assert_eq!(config.theme, "light");
        assert_eq!(config.progress_interval_ms, 200);
        assert_eq!(config.progress_increment, 10);
    }

    #[test]
    fn test_validate_rejects_bad_increment() {
        let config = Config {
            progress_increment: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            progress_increment: 150,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
