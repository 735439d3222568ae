//! Error scenario and edge case tests
//!
//! Run with: cargo test --test error_scenarios_tests
//! Covers:
//! - Missing settings and config files
//! - Malformed settings lists
//! - Invalid configuration values

use settings_patcher::config::load_config_from_str;
use settings_patcher::error::Error;
use settings_patcher::{patch_settings, Config, Patcher, WriteMode};
use std::fs;
use tempfile::TempDir;

// ============================================================================
// File Error Tests
// ============================================================================

#[test]
fn test_error_settings_not_found() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.py");

    let err = patch_settings(&path).unwrap_err();
    assert!(matches!(err, Error::SettingsNotFound(_)));
    assert!(err.to_string().contains("missing.py"));
    assert!(!path.exists(), "Patcher must not create the file");
    println!("✓ SettingsNotFound error: {}", err);
}

#[test]
fn test_error_settings_path_is_directory() {
    let dir = TempDir::new().unwrap();
    let err = patch_settings(dir.path()).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    println!("✓ Directory path rejected: {}", err);
}

#[test]
fn test_error_settings_not_utf8() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.py");
    fs::write(&path, [0xff, 0xfe, 0x00, 0x41]).unwrap();

    let err = patch_settings(&path).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

// ============================================================================
// Malformed Settings Tests
// ============================================================================

#[test]
fn test_error_unclosed_list_leaves_file_untouched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.py");
    let content = "DEBUG = True\nINSTALLED_APPS = [\n    \"django.contrib.admin\",\n";
    fs::write(&path, content).unwrap();

    let err = patch_settings(&path).unwrap_err();
    match &err {
        Error::UnclosedList { name, line } => {
            assert_eq!(name, "INSTALLED_APPS");
            assert_eq!(*line, 2);
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(fs::read_to_string(&path).unwrap(), content);
    println!("✓ Unclosed list error: {}", err);
}

#[test]
fn test_bracket_in_string_does_not_close_list() {
    let config = Config::default();
    let content = "INSTALLED_APPS = [\n    \"weird]app\",\n]\n";

    let patched = Patcher::new(&config).patch_text(content).unwrap();
    assert!(patched
        .text
        .starts_with("INSTALLED_APPS = [\n    \"weird]app\",\n    \"corsheaders\",\n    \"rest_framework\",\n]\n"));
}

#[test]
fn test_empty_settings_file_gets_only_the_block() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.py");
    fs::write(&path, "").unwrap();

    let report = Patcher::new(&Config::default())
        .patch_file(&path, WriteMode::Write)
        .unwrap();

    assert!(report.steps[0].outcome.is_applied());
    assert!(!report.steps[1].outcome.is_applied());
    assert!(!report.steps[2].outcome.is_applied());
    assert!(fs::read_to_string(&path)
        .unwrap()
        .starts_with("\n\n# CORS settings\n"));
}

// ============================================================================
// Configuration Error Tests
// ============================================================================

#[test]
fn test_error_config_invalid_toml() {
    let err = load_config_from_str("this is [ not valid toml").unwrap_err();
    assert!(matches!(err, Error::TomlParse(_)));
    assert!(err.to_string().contains("TOML"));
    println!("✓ TOML parse error: {}", err);
}

#[test]
fn test_error_config_invalid_list_name() {
    let err = load_config_from_str("[installed_apps]\nlist = \"INSTALLED-APPS\"\n").unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn test_error_config_empty_apps() {
    let err = load_config_from_str("[installed_apps]\napps = []\n").unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    println!("✓ Empty apps rejected: {}", err);
}

#[test]
fn test_error_config_wrong_type() {
    let err = load_config_from_str("[cors]\nallow_credentials = \"yes\"\n").unwrap_err();
    assert!(matches!(err, Error::TomlParse(_)));
}
