/*!
 * Tests for application configuration functionality
 */

use std::fs;
use std::time::Duration;

use paratrans::app_config::{Config, LogLevel};

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "fr");
    assert_eq!(config.endpoint.host, "google.com");
    assert_eq!(config.endpoint.tries, 2);
    assert_eq!(config.endpoint.retry_delay(), Duration::from_millis(500));
    assert_eq!(config.endpoint.timeout(), Duration::from_secs(30));
    assert!(!config.endpoint.sign_requests);
    assert_eq!(config.dispatch.concurrent_requests, 10);
    assert_eq!(config.output.text_column, 3);
    assert!(config.output.retranslate_sentences);
    assert!(!config.output.vocabulary);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.source_language = "auto".to_string();
    assert!(config.validate().is_ok());

    config.source_language = "xyz".to_string();
    assert!(config.validate().is_err());
    config.source_language = "en".to_string();

    config.target_language = "".to_string();
    assert!(config.validate().is_err());
    config.target_language = "zh-CN".to_string();
    assert!(config.validate().is_ok());

    config.dispatch.concurrent_requests = 0;
    assert!(config.validate().is_err());
    config.dispatch.concurrent_requests = 4;

    config.output.text_column = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_load_or_default_withPartialFile_shouldFillDefaults() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(
        dir.path(),
        "conf.json",
        r#"{ "target_language": "de", "endpoint": { "tries": 5 }, "log_level": "debug" }"#,
    )
    .unwrap();

    let config = Config::load_or_default(&path).unwrap();

    assert_eq!(config.target_language, "de");
    assert_eq!(config.endpoint.tries, 5);
    assert_eq!(config.endpoint.host, "google.com");
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.log_level.to_level_filter(), log::LevelFilter::Debug);
}

#[test]
fn test_load_or_default_withMissingFile_shouldNotCreateIt() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");

    let config = Config::load_or_default(&path).unwrap();

    assert_eq!(config.target_language, "fr");
    assert!(!path.exists());
}

#[test]
fn test_load_or_default_withInvalidJson_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");
    fs::write(&path, "{ not json").unwrap();

    assert!(Config::load_or_default(&path).is_err());
}

#[test]
fn test_interactive_concurrency_shouldScaleWithMultiplier() {
    let mut config = Config::default();
    config.dispatch.interactive_multiplier = 4;
    let base = config.dispatch.interactive_concurrency();

    assert!(base >= 4);
    assert_eq!(base % 4, 0);
}
