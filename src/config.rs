use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Environment variable consulted when the config file has no API key
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Keys shorter than this are rejected at startup
pub const MIN_API_KEY_LEN: usize = 20;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API key for the completion service
    pub openai_api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API
    pub api_base_url: String,

    /// Per-request timeout; the HTTP client default applies when unset
    pub request_timeout_secs: Option<u64>,

    /// Default log filter, overridden by `RUST_LOG`
    pub log_level: String,

    /// Where persisted conversations live
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            openai_api_key: None,
            api_base_url: "https://api.openai.com/v1".to_string(),
            request_timeout_secs: None,
            log_level: "info".to_string(),
            data_dir: Self::default_home(),
        }
    }
}

impl Config {
    fn default_home() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".codehelper")
    }

    /// Load configuration from `~/.codehelper/config.toml`, falling back to defaults
    pub fn load() -> Result<Self> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Self::load_from(&home.join(".codehelper").join("config.toml"))
    }

    /// Load configuration from an explicit path
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Directory holding one JSON file per conversation
    pub fn conversations_dir(&self) -> PathBuf {
        self.data_dir.join("conversations")
    }

    /// Get API key from config or environment
    pub fn api_key(&self) -> Option<String> {
        self.openai_api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok())
    }

    /// The API key, checked for presence and plausible length
    pub fn validated_api_key(&self) -> Result<String, ConfigError> {
        let key = self
            .api_key()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        if key.len() < MIN_API_KEY_LEN {
            return Err(ConfigError::InvalidApiKey {
                min_len: MIN_API_KEY_LEN,
            });
        }

        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config.api_base_url, "https://api.openai.com/v1");
        assert_eq!(config.request_timeout_secs, None);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "request_timeout_secs = 30\nlog_level = \"debug\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.request_timeout_secs, Some(30));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.api_base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn short_key_is_rejected() {
        let config = Config {
            openai_api_key: Some("sk-short".to_string()),
            ..Config::default()
        };

        assert!(matches!(
            config.validated_api_key(),
            Err(ConfigError::InvalidApiKey {
                min_len: MIN_API_KEY_LEN
            })
        ));
    }

    #[test]
    fn configured_key_wins() {
        let key = "sk-0123456789abcdefghijklmnop";
        let config = Config {
            openai_api_key: Some(key.to_string()),
            ..Config::default()
        };

        assert_eq!(config.validated_api_key().unwrap(), key);
    }
}
