/*!
 * Tests for application configuration functionality
 */

use std::time::Duration;

use paratrans::app_config::{Config, LogLevel};
use paratrans::errors::ConfigError;
use paratrans::providers::mock::MockProvider;

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() -> anyhow::Result<()> {
    let config = Config::default();

    assert_eq!(config.target_language, "Spanish");
    assert_eq!(config.translation.model, "gpt-3.5-turbo");
    assert_eq!(config.translation.endpoint, "https://api.openai.com/v1");
    assert_eq!(config.translation.concurrent_requests, 10);
    assert_eq!(config.translation.max_words_per_chunk, 10_000);
    assert_eq!(config.translation.initial_interval()?, Duration::from_secs(1));
    assert_eq!(config.translation.max_backoff()?, Duration::from_secs(60));
    assert_eq!(config.translation.timeout(), Duration::from_secs(120));
    assert!(!config.translation.reset_backoff_on_success);
    assert!(!config.document.bilingual);
    assert!(config.document.extension_filter.is_none());
    assert_eq!(config.log_level, LogLevel::Info);
    Ok(())
}

/// Missing API key is the first thing validation reports
#[test]
fn test_validate_withoutApiKey_shouldFailWithMissingKey() {
    let config = Config::default();
    assert!(matches!(config.validate(), Err(ConfigError::MissingApiKey)));
}

fn assert_invalid(expected: &str, mutate: impl Fn(&mut Config)) {
    let mut config = common::test_config();
    assert!(config.validate().is_ok());
    mutate(&mut config);
    match config.validate() {
        Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, expected),
        other => panic!("{}: unexpected result {:?}", expected, other),
    }
}

/// Out-of-range values are rejected with the offending field
#[test]
fn test_validate_withInvalidValues_shouldNameField() {
    assert_invalid("target_language", |c| c.target_language = "  ".to_string());
    assert_invalid("concurrent_requests", |c| c.translation.concurrent_requests = 0);
    assert_invalid("max_words_per_chunk", |c| c.translation.max_words_per_chunk = 0);
    assert_invalid("initial_interval_secs", |c| c.translation.initial_interval_secs = 0.0);
    assert_invalid("max_backoff_secs", |c| c.translation.max_backoff_secs = 0.5);
    assert_invalid("model", |c| c.translation.model = String::new());
    assert_invalid("timeout_secs", |c| c.translation.timeout_secs = 0);
}

/// Huge waits are rejected up front instead of overflowing a Duration later
#[test]
fn test_validate_withOversizedIntervals_shouldReject() {
    assert_invalid("max_backoff_secs", |c| c.translation.max_backoff_secs = 1e20);
    assert_invalid("max_backoff_secs", |c| c.translation.max_backoff_secs = f64::INFINITY);
    assert_invalid("initial_interval_secs", |c| {
        c.translation.initial_interval_secs = 1e20;
        c.translation.max_backoff_secs = 1e21;
    });
    assert_invalid("timeout_secs", |c| c.translation.timeout_secs = u64::MAX);
}

/// Building a controller from an unvalidated oversized config errors instead of panicking
#[test]
fn test_controller_withOversizedBackoff_shouldReturnError() {
    let mut config = common::test_config();
    config.translation.max_backoff_secs = 1e20;

    let result = common::mock_controller(config, MockProvider::working());

    assert!(result.is_err());
}

/// Partial JSON files fall back to defaults for missing keys
#[test]
fn test_load_withPartialFile_shouldFillDefaults() -> anyhow::Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        dir.path(),
        "conf.json",
        r#"{
            "target_language": "German",
            "translation": { "api_key": "sk-file", "concurrent_requests": 3, "reset_backoff_on_success": true },
            "document": { "bilingual": true, "extension_filter": "md" },
            "log_level": "debug"
        }"#,
    )?;

    let config = Config::load(&path)?;

    assert_eq!(config.target_language, "German");
    assert_eq!(config.translation.api_key, "sk-file");
    assert_eq!(config.translation.concurrent_requests, 3);
    assert!(config.translation.reset_backoff_on_success);
    assert_eq!(config.translation.model, "gpt-3.5-turbo");
    assert!(config.document.bilingual);
    assert_eq!(config.document.extension_filter.as_deref(), Some("md"));
    assert_eq!(config.log_level, LogLevel::Debug);
    assert!(config.validate().is_ok());
    Ok(())
}

/// Malformed JSON is reported, not defaulted
#[test]
fn test_load_withMalformedFile_shouldFail() -> anyhow::Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_file(dir.path(), "conf.json", "{ not json")?;
    assert!(Config::load(&path).is_err());
    assert!(Config::load(dir.path().join("missing.json")).is_err());
    Ok(())
}
