//! Configuration for the capability adapter, corpus and dish mapping.
//!
//! Values come from serde defaults, then an optional JSON file, then
//! `MENUFLOW_*` environment variables.

use crate::capability::RetryConfig;
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings for the text-understanding capability endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityConfig {
    /// Base URL of an OpenAI-compatible API (without `/chat/completions`).
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Model identifier.
    #[serde(default = "default_model_id")]
    pub model_id: String,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Project identifier forwarded to providers that scope usage by project.
    #[serde(default)]
    pub project_id: Option<String>,
    /// Maximum tokens to generate.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature.
    #[serde(default)]
    pub temperature: f64,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
}

fn default_endpoint() -> String {
    "https://api.mistral.ai/v1".to_string()
}

fn default_model_id() -> String {
    "mistral-large-latest".to_string()
}

fn default_api_key_env() -> String {
    "MENUFLOW_API_KEY".to_string()
}

const fn default_max_tokens() -> u32 {
    1000
}

const fn default_timeout() -> f64 {
    60.0
}

impl Default for CapabilityConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model_id: default_model_id(),
            api_key_env: default_api_key_env(),
            project_id: None,
            max_tokens: default_max_tokens(),
            temperature: 0.0,
            timeout_seconds: default_timeout(),
        }
    }
}

impl CapabilityConfig {
    /// Sets the endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the model id.
    #[must_use]
    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Gets timeout as Duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_seconds.max(0.0))
    }
}

/// Where the menu corpus lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Directory of per-restaurant JSON menus.
    #[serde(default = "default_json_dir")]
    pub json_dir: PathBuf,
    /// Directory of plain-text menus for keyword search.
    #[serde(default = "default_text_dir")]
    pub text_dir: PathBuf,
    /// Sort documents by identifier before scanning.
    #[serde(default = "default_true")]
    pub sort_identifiers: bool,
}

fn default_json_dir() -> PathBuf {
    PathBuf::from("data/MenuJSON")
}

fn default_text_dir() -> PathBuf {
    PathBuf::from("data/MenuTxt")
}

const fn default_true() -> bool {
    true
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            json_dir: default_json_dir(),
            text_dir: default_text_dir(),
            sort_identifiers: true,
        }
    }
}

/// Where the dish name mapping lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingConfig {
    /// JSON file mapping dish names to ids.
    #[serde(default = "default_mapping_path")]
    pub path: PathBuf,
}

fn default_mapping_path() -> PathBuf {
    PathBuf::from("data/Misc/dish_mapping.json")
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            path: default_mapping_path(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuflowConfig {
    /// Capability endpoint settings.
    #[serde(default)]
    pub capability: CapabilityConfig,
    /// Retry policy for capability calls.
    #[serde(default)]
    pub retry: RetryConfig,
    /// Corpus location.
    #[serde(default)]
    pub corpus: CorpusConfig,
    /// Dish mapping location.
    #[serde(default)]
    pub mapping: MappingConfig,
}

impl MenuflowConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the file if given, then applies process environment overrides
    /// and validates.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` on read, parse or validation failure.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        let config = config.with_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `MENUFLOW_*` overrides read through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if a numeric override does not parse.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parse<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
            raw.trim()
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("{key}={raw} is not a valid value")))
        }

        if let Some(v) = lookup("MENUFLOW_ENDPOINT") {
            self.capability.endpoint = v;
        }
        if let Some(v) = lookup("MENUFLOW_MODEL_ID") {
            self.capability.model_id = v;
        }
        if let Some(v) = lookup("MENUFLOW_PROJECT_ID") {
            self.capability.project_id = Some(v);
        }
        if let Some(v) = lookup("MENUFLOW_MAX_TOKENS") {
            self.capability.max_tokens = parse("MENUFLOW_MAX_TOKENS", &v)?;
        }
        if let Some(v) = lookup("MENUFLOW_TIMEOUT_SECONDS") {
            self.capability.timeout_seconds = parse("MENUFLOW_TIMEOUT_SECONDS", &v)?;
        }
        if let Some(v) = lookup("MENUFLOW_MAX_ATTEMPTS") {
            self.retry.max_attempts = parse("MENUFLOW_MAX_ATTEMPTS", &v)?;
        }
        if let Some(v) = lookup("MENUFLOW_CORPUS_DIR") {
            self.corpus.json_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("MENUFLOW_TEXT_DIR") {
            self.corpus.text_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("MENUFLOW_MAPPING_PATH") {
            self.mapping.path = PathBuf::from(v);
        }

        Ok(self)
    }

    /// Validates value ranges.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capability.model_id.trim().is_empty() {
            return Err(ConfigError::Invalid("capability.model_id must not be empty".into()));
        }
        if self.capability.timeout_seconds <= 0.0 || !self.capability.timeout_seconds.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "capability.timeout_seconds must be positive, got {}",
                self.capability.timeout_seconds
            )));
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid("retry.max_attempts must be at least 1".into()));
        }
        Ok(())
    }
}
