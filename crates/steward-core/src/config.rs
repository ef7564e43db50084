//! Configuration model.
//!
//! Loaded from `config.toml` by the infrastructure `ConfigService`. Every
//! section and field has a default, so a missing or partial file is valid.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct StewardConfig {
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub exception_log: ExceptionLogSettings,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// `EnvFilter` directive, e.g. `"info"` or `"steward_execution=debug"`.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
    /// Write daily rolling log files here in addition to stderr.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            directory: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ExceptionLogSettings {
    /// Directory for the file-backed exception log. In-memory when unset.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: StewardConfig = toml::from_str("").unwrap();
        assert_eq!(config, StewardConfig::default());
        assert_eq!(config.logging.level, "info");
        assert!(config.exception_log.directory.is_none());
    }

    #[test]
    fn test_partial_document() {
        let config: StewardConfig = toml::from_str(
            r#"
            [logging]
            level = "debug"

            [exception_log]
            directory = "/var/lib/steward/exceptions"
            "#,
        )
        .unwrap();

        assert_eq!(config.logging.level, "debug");
        assert!(!config.logging.json);
        assert_eq!(
            config.exception_log.directory,
            Some(PathBuf::from("/var/lib/steward/exceptions"))
        );
    }
}
