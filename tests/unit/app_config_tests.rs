/*!
 * Tests for configuration loading and validation
 */

use subrelay::app_config::{BackendProvider, Config};
use crate::common;

/// Test the default configuration validates cleanly
#[test]
fn test_default_config_shouldValidate() {
    let config = Config::default();
    assert_eq!(config.source_language, "zh");
    assert_eq!(config.target_language, "en");
    assert_eq!(config.backend.provider, BackendProvider::Local);
    assert_eq!(config.batch.max_entries, 100);
    assert!(config.validate().is_ok());
}

/// Test loading a configuration from a JSON file
#[test]
fn test_from_file_withValidJson_shouldLoad() {
    let temp_dir = common::create_temp_dir().unwrap();
    let content = r#"{
        "source_language": "zh_hans",
        "target_language": "fr",
        "backend": { "type": "local", "endpoint": "http://localhost:9000" },
        "batch": { "max_entries": 25 },
        "concurrent_files": 2
    }"#;
    let path = common::create_test_file(&temp_dir.path().to_path_buf(), "conf.json", content).unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.source_language, "zh_hans");
    assert_eq!(config.target_language, "fr");
    assert_eq!(config.backend.endpoint, "http://localhost:9000");
    assert_eq!(config.batch.max_entries, 25);
    assert_eq!(config.concurrent_files, 2);
    assert!(config.validate().is_ok());
}

/// Test that a missing file is an error, not a silent default
#[test]
fn test_from_file_withMissingFile_shouldError() {
    assert!(Config::from_file("/no/such/conf.json").is_err());
}

/// Test that matching source and target languages are rejected
#[test]
fn test_validate_withSameLanguages_shouldError() {
    let mut config = Config::default();
    config.source_language = "zh_hans".to_string();
    config.target_language = "zh".to_string();
    assert!(config.validate().is_err());
}

/// Test that an unknown language code is rejected
#[test]
fn test_validate_withBadLanguage_shouldError() {
    let mut config = Config::default();
    config.source_language = "xx".to_string();
    assert!(config.validate().is_err());
}

/// Test that the Google backend requires credentials
#[test]
fn test_validate_withGoogleAndNoCredentials_shouldError() {
    let mut config = Config::default();
    config.backend.provider = BackendProvider::Google;
    assert!(config.validate().is_err());

    config.backend.project_id = "my-project".to_string();
    config.backend.access_token = "token".to_string();
    assert!(config.validate().is_ok());
}

/// Test that a malformed endpoint is rejected for the local backend
#[test]
fn test_validate_withBadEndpoint_shouldError() {
    let mut config = Config::default();
    config.backend.endpoint = "not a url".to_string();
    assert!(config.validate().is_err());
}

/// Test that sizing limits of zero are rejected
#[test]
fn test_validate_withZeroLimits_shouldError() {
    let mut config = Config::default();
    config.batch.max_entries = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.concurrent_files = 0;
    assert!(config.validate().is_err());
}
