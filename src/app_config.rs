use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use crate::errors::ConfigError;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and defaulting configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Target language name as written in the prompt (e.g. "Spanish")
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Document handling config
    #[serde(default)]
    pub document: DocumentConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    // @field: Model name
    #[serde(default = "default_model")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    // @field: Timeout seconds for a single request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Worker pool size
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    // @field: Word count above which a paragraph is split in two
    #[serde(default = "default_max_words_per_chunk")]
    pub max_words_per_chunk: usize,

    /// Starting minimum spacing between requests, in seconds
    #[serde(default = "default_initial_interval_secs")]
    pub initial_interval_secs: f64,

    /// Ceiling for the doubled interval after failures, in seconds
    #[serde(default = "default_max_backoff_secs")]
    pub max_backoff_secs: f64,

    /// Restore the initial interval after each successful request.
    ///
    /// Off by default: a slow period keeps the whole remaining run at the
    /// widened interval.
    #[serde(default)]
    pub reset_backoff_on_success: bool,

    /// Temperature parameter for text generation (0.0 to 1.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: String::new(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            concurrent_requests: default_concurrent_requests(),
            max_words_per_chunk: default_max_words_per_chunk(),
            initial_interval_secs: default_initial_interval_secs(),
            max_backoff_secs: default_max_backoff_secs(),
            reset_backoff_on_success: false,
            temperature: None,
        }
    }
}

/// Upper bound for intervals and the request timeout, in seconds (one day)
pub const MAX_WAIT_SECS: u64 = 86_400;

impl TranslationConfig {
    /// Initial rate interval as a Duration
    pub fn initial_interval(&self) -> Result<Duration, ConfigError> {
        seconds("initial_interval_secs", self.initial_interval_secs)
    }

    /// Backoff ceiling as a Duration
    pub fn max_backoff(&self) -> Result<Duration, ConfigError> {
        seconds("max_backoff_secs", self.max_backoff_secs)
    }

    /// Request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Document handling options
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct DocumentConfig {
    /// Write `<stem>_bilingual.txt` instead of `<stem>_translated.txt`
    #[serde(default)]
    pub bilingual: bool,

    /// Ask the translator to leave people's names untranslated
    #[serde(default)]
    pub preserve_names: bool,

    /// Keep the trailing references section untranslated
    #[serde(default)]
    pub exclude_references: bool,

    /// Repeat the first paragraphs untranslated above the translation
    #[serde(default)]
    pub keep_leading_paragraphs: bool,

    /// Only process this extension when scanning folders
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension_filter: Option<String>,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching `log` filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_target_language() -> String {
    "Spanish".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_concurrent_requests() -> usize {
    10
}

fn default_max_words_per_chunk() -> usize {
    crate::translation::splitter::MAX_WORDS_PER_CHUNK
}

fn default_initial_interval_secs() -> f64 {
    1.0
}

fn default_max_backoff_secs() -> f64 {
    60.0
}

impl Config {
    /// Load a configuration file, falling back to defaults for missing keys
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.translation.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }

        if self.target_language.trim().is_empty() {
            return Err(invalid("target_language", "must not be empty"));
        }

        if self.translation.concurrent_requests == 0 {
            return Err(invalid("concurrent_requests", "must be at least 1"));
        }

        if self.translation.max_words_per_chunk == 0 {
            return Err(invalid("max_words_per_chunk", "must be at least 1"));
        }

        let initial = self.translation.initial_interval_secs;
        let ceiling = self.translation.max_backoff_secs;
        let limit = MAX_WAIT_SECS as f64;
        if !initial.is_finite() || initial <= 0.0 || initial > limit {
            return Err(invalid(
                "initial_interval_secs",
                &format!("must be a positive number of at most {} seconds", MAX_WAIT_SECS),
            ));
        }
        if !ceiling.is_finite() || ceiling < initial || ceiling > limit {
            return Err(invalid(
                "max_backoff_secs",
                &format!(
                    "must be between initial_interval_secs and {} seconds",
                    MAX_WAIT_SECS
                ),
            ));
        }

        if self.translation.timeout_secs == 0 || self.translation.timeout_secs > MAX_WAIT_SECS {
            return Err(invalid(
                "timeout_secs",
                &format!("must be between 1 and {} seconds", MAX_WAIT_SECS),
            ));
        }

        if self.translation.model.trim().is_empty() {
            return Err(invalid("model", "must not be empty"));
        }

        Ok(())
    }
}

fn seconds(field: &str, value: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(value)
        .map_err(|_| invalid(field, "must be a non-negative, representable number of seconds"))
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            target_language: default_target_language(),
            translation: TranslationConfig::default(),
            document: DocumentConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
