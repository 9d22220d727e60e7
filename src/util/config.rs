use std::{fs, io, path::PathBuf, time::Duration};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeError;
use tracing::{debug, warn};

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "MachinistQuote";
const APP_NAME: &str = "MachinistQuote";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/";
pub const DEFAULT_DEBOUNCE_MS: u64 = 750;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Provider and timing settings.
///
/// Read from `config.json` in the platform config directory, then overridden by
/// `GEMINI_API_KEY` (or `API_KEY`), `GEMINI_MODEL`, `GEMINI_BASE_URL`,
/// `QUOTE_DEBOUNCE_MS` and `QUOTE_REQUEST_TIMEOUT_SECS`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub debounce_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("invalid config file: {0}")]
    Serde(#[from] SerdeError),
}

impl AppConfig {
    /// File config plus environment overrides. A broken file falls back to defaults.
    pub fn load() -> Self {
        let mut config = match config_file() {
            Some(path) if path.exists() => match Self::read_from(&path) {
                Ok(config) => {
                    debug!(path = %path.display(), "loaded config file");
                    config
                }
                Err(err) => {
                    warn!(path = %path.display(), "ignoring config file: {err}");
                    Self::default()
                }
            },
            _ => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    pub fn read_from(path: &std::path::Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(key) = var("GEMINI_API_KEY").or_else(|| var("API_KEY")) {
            self.api_key = Some(key);
        }
        if let Some(model) = var("GEMINI_MODEL") {
            self.model = model;
        }
        if let Some(base_url) = var("GEMINI_BASE_URL") {
            self.base_url = base_url;
        }
        if let Some(ms) = var("QUOTE_DEBOUNCE_MS") {
            match ms.trim().parse() {
                Ok(ms) => self.debounce_ms = ms,
                Err(_) => warn!(value = %ms, "QUOTE_DEBOUNCE_MS is not a number"),
            }
        }
        if let Some(secs) = var("QUOTE_REQUEST_TIMEOUT_SECS") {
            match secs.trim().parse() {
                Ok(secs) => self.request_timeout_secs = secs,
                Err(_) => warn!(value = %secs, "QUOTE_REQUEST_TIMEOUT_SECS is not a number"),
            }
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_deref()
            .map(|key| !key.trim().is_empty())
            .unwrap_or(false)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

pub fn config_file() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join("config.json"))
}
