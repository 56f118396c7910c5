// Application configuration.
// Loads settings from the platform config file with environment overrides.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::Language;
use crate::error::{JothidaError, Result};

pub const ENV_API_URL: &str = "JOTHIDA_API_URL";
pub const ENV_LANG: &str = "JOTHIDA_LANG";

/// Runtime settings for the client and the scoring cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub score_ttl_secs: u64,
    pub score_cache_capacity: usize,
    pub language: Language,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            request_timeout_secs: 20,
            score_ttl_secs: 5 * 60,
            score_cache_capacity: 32,
            language: Language::Tamil,
        }
    }
}

impl Config {
    /// Load from the default config file (if present) and the environment.
    pub fn load() -> Result<Self> {
        let mut config = match crate::storage::paths::config_path() {
            Some(path) => Self::from_path(&path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (normally the process environment).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
        if let Some(lang) = lookup(ENV_LANG).filter(|v| !v.trim().is_empty()) {
            self.language = lang.parse()?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://"))
        {
            return Err(JothidaError::Config(format!(
                "api_base_url must be an http(s) URL, got {:?}",
                self.api_base_url
            )));
        }
        if self.score_cache_capacity == 0 {
            return Err(JothidaError::Config(
                "score_cache_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn score_ttl(&self) -> Duration {
        Duration::from_secs(self.score_ttl_secs)
    }
}
