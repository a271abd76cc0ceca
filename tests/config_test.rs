//! Integration tests for layered Settings loading.
//!
//! These tests only assert on values set by a local `.pyramid.toml` in a
//! temporary directory, so a global config on the machine does not matter.

use std::fs;

use tempfile::TempDir;

use pyramid::config::{local_config_path, Settings, DEFAULT_MAX_UPLOAD_BYTES};

#[test]
fn given_local_config_when_load_then_overrides_defaults() {
    // Arrange
    let project = TempDir::new().unwrap();
    let local = r#"
model = "gemini-1.5-pro"
max_upload_bytes = 2048

[layout]
node_width = 180.0
"#;
    fs::write(project.path().join(".pyramid.toml"), local).unwrap();

    // Act
    let settings = Settings::load(Some(project.path())).expect("load settings");

    // Assert
    assert_eq!(settings.model, "gemini-1.5-pro");
    assert_eq!(settings.max_upload_bytes, 2048);
    assert_eq!(settings.layout.node_width, 180.0);
}

#[test]
fn given_partial_layout_when_load_then_other_layout_fields_kept() {
    let project = TempDir::new().unwrap();
    fs::write(
        project.path().join(".pyramid.toml"),
        "[layout]\nconnector_cap = 25.0\n",
    )
    .unwrap();

    let settings = Settings::load(Some(project.path())).unwrap();

    assert_eq!(settings.layout.connector_cap, 25.0);
    assert!(settings.layout.node_height > 0.0);
}

#[test]
fn given_invalid_toml_when_load_then_config_error() {
    let project = TempDir::new().unwrap();
    fs::write(project.path().join(".pyramid.toml"), "model = [unclosed").unwrap();

    let err = Settings::load(Some(project.path())).unwrap_err();

    assert!(err.to_string().starts_with("config error"));
}

#[test]
fn given_project_dir_when_resolving_local_path_then_dotfile() {
    let project = TempDir::new().unwrap();
    assert_eq!(
        local_config_path(project.path()),
        project.path().join(".pyramid.toml")
    );
}

#[test]
fn given_api_key_when_redacted_then_masked_in_toml() {
    let settings = Settings {
        api_key: Some("secret-key".into()),
        ..Settings::default()
    };

    let toml = settings.redacted().to_toml().unwrap();

    assert!(!toml.contains("secret-key"));
    assert!(toml.contains("********"));
    assert_eq!(Settings::default().max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
}
