//! Integration tests for dosimeter-config.
//!
//! These tests exercise the file round trip and validation together.

use dosimeter_config::{ConfigError, PipelineConfig, find_config};
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn save_creates_parent_directories_and_loads_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("deeper").join("dosimeter.toml");

    let mut config = PipelineConfig::default();
    config.input = PathBuf::from("campo/lunes.csv");
    config.reduction_percent = 35.0;
    config.charts = false;
    config.save(&path).unwrap();

    let loaded = PipelineConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
    assert!(loaded.validate().is_ok());
    assert_eq!(find_config(path.to_str().unwrap()), Some(path));
}

#[test]
fn load_missing_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.toml");
    match PipelineConfig::load(&path) {
        Err(ConfigError::ReadFile { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected ReadFile error, got {other:?}"),
    }
}

#[test]
fn loaded_file_can_fail_validation() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "sample_interval_s = -1.0\n").unwrap();

    let config = PipelineConfig::load(&path).unwrap();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Invalid {
            field: "sample_interval_s",
            ..
        })
    ));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "input = [unterminated\n").unwrap();
    assert!(matches!(
        PipelineConfig::load(&path),
        Err(ConfigError::TomlParse(_))
    ));
}
