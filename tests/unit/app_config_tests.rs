/*!
 * Tests for application configuration functionality
 */

use skucheck::app_config::{Config, LogLevel};
use skucheck::{ProductTemplate, StoreLocation};

use crate::common::create_temp_dir;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.database_path.is_none());
    assert!(config.reference.product("1001").is_some());
    assert!(config.reference.checklist_item("altura").is_some());
    assert!(config.validate().is_ok());
}

#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() {
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");

    let config = Config::load_or_create(&path).expect("Failed to create config");

    assert!(path.exists());
    assert_eq!(config, Config::default());

    let reloaded = Config::load_or_create(&path).expect("Failed to reload config");
    assert_eq!(reloaded, config);
}

#[test]
fn test_loadOrCreate_withPartialFile_shouldFillDefaults() {
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");
    std::fs::write(
        &path,
        r#"{ "database_path": "/var/lib/skucheck/checks.db", "log_level": "debug" }"#,
    )
    .unwrap();

    let config = Config::load_or_create(&path).unwrap();

    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(
        config.store_location().unwrap(),
        StoreLocation::File("/var/lib/skucheck/checks.db".into())
    );
    assert!(!config.reference.products.is_empty());
}

#[test]
fn test_loadOrCreate_withInvalidJson_shouldFail() {
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = Config::load_or_create(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}

#[test]
fn test_validate_withDuplicateSku_shouldFail() {
    let mut config = Config::default();
    config.reference.products.push(ProductTemplate::new("1001", "Duplicate", "1"));

    assert!(config.validate().is_err());
}

#[test]
fn test_storeLocation_withoutPath_shouldUseDataDirectory() {
    let config = Config::default();

    match config.store_location() {
        Ok(StoreLocation::File(path)) => assert!(path.ends_with("skucheck/skucheck.db")),
        Ok(other) => panic!("unexpected location: {other}"),
        // No home directory in this environment
        Err(e) => assert!(e.to_string().contains("data directory")),
    }
}
