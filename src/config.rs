//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/pyramid/pyramid.toml`
//! 3. Local config: `<project_dir>/.pyramid.toml`
//! 4. `GEMINI_API_KEY` / `GOOGLE_API_KEY` for the model key
//! 5. Environment variables: `PYRAMID__*` prefix (`PYRAMID__LAYOUT__NODE_WIDTH=180`)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::LayoutConfig;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Unified configuration for pyramid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Gemini API key
    pub api_key: Option<String>,
    /// Model name used for analysis
    pub model: String,
    /// Base URL of the Gemini REST API
    pub api_base_url: String,
    /// Request timeout; transport default when unset
    pub request_timeout_secs: Option<u64>,
    /// Largest accepted input document
    pub max_upload_bytes: u64,
    /// Where analysis results and exported decks are written
    pub output_dir: PathBuf,
    /// Diagram geometry
    pub layout: LayoutConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.into(),
            api_base_url: DEFAULT_API_BASE_URL.into(),
            request_timeout_secs: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            output_dir: PathBuf::from("."),
            layout: LayoutConfig::default(),
        }
    }
}

/// Raw layout table; unset fields inherit from the layer below.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLayoutConfig {
    pub node_width: Option<f32>,
    pub node_height: Option<f32>,
    pub horizontal_gap: Option<f32>,
    pub vertical_gap: Option<f32>,
    pub padding: Option<f32>,
    pub connector_cap: Option<f32>,
}

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub api_base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub max_upload_bytes: Option<u64>,
    pub output_dir: Option<PathBuf>,
    pub layout: RawLayoutConfig,
}

fn merge_layout(base: &LayoutConfig, overlay: &RawLayoutConfig) -> LayoutConfig {
    LayoutConfig {
        node_width: overlay.node_width.unwrap_or(base.node_width),
        node_height: overlay.node_height.unwrap_or(base.node_height),
        horizontal_gap: overlay.horizontal_gap.unwrap_or(base.horizontal_gap),
        vertical_gap: overlay.vertical_gap.unwrap_or(base.vertical_gap),
        padding: overlay.padding.unwrap_or(base.padding),
        connector_cap: overlay.connector_cap.unwrap_or(base.connector_cap),
    }
}

/// Expand environment variables and `~` in a path string.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// Get the XDG config directory for pyramid.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "pyramid").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("pyramid.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".pyramid.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Overlay wins wherever it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            api_key: overlay.api_key.clone().or_else(|| self.api_key.clone()),
            model: overlay.model.clone().unwrap_or_else(|| self.model.clone()),
            api_base_url: overlay
                .api_base_url
                .clone()
                .unwrap_or_else(|| self.api_base_url.clone()),
            request_timeout_secs: overlay.request_timeout_secs.or(self.request_timeout_secs),
            max_upload_bytes: overlay.max_upload_bytes.unwrap_or(self.max_upload_bytes),
            output_dir: overlay
                .output_dir
                .clone()
                .unwrap_or_else(|| self.output_dir.clone()),
            layout: merge_layout(&self.layout, &overlay.layout),
        }
    }

    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.output_dir.to_string_lossy().as_ref());
        self.output_dir = PathBuf::from(expanded);
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional directory holding a local `.pyramid.toml`
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("loading global config {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(dir) = project_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!("loading local config {}", local_path.display());
                current = current.merge_with(&load_raw_settings(&local_path)?);
            }
        }

        if let Some(key) = ["GEMINI_API_KEY", "GOOGLE_API_KEY"]
            .iter()
            .find_map(|name| std::env::var(name).ok().filter(|v| !v.is_empty()))
        {
            current.api_key = Some(key);
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply PYRAMID__* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("PYRAMID").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("api_key") {
            settings.api_key = Some(val);
        }
        if let Ok(val) = config.get_string("model") {
            settings.model = val;
        }
        if let Ok(val) = config.get_string("api_base_url") {
            settings.api_base_url = val;
        }
        if let Ok(val) = config.get::<u64>("request_timeout_secs") {
            settings.request_timeout_secs = Some(val);
        }
        if let Ok(val) = config.get::<u64>("max_upload_bytes") {
            settings.max_upload_bytes = val;
        }
        if let Ok(val) = config.get_string("output_dir") {
            settings.output_dir = PathBuf::from(val);
        }
        let layout = &mut settings.layout;
        for (key, field) in [
            ("layout.node_width", &mut layout.node_width),
            ("layout.node_height", &mut layout.node_height),
            ("layout.horizontal_gap", &mut layout.horizontal_gap),
            ("layout.vertical_gap", &mut layout.vertical_gap),
            ("layout.padding", &mut layout.padding),
            ("layout.connector_cap", &mut layout.connector_cap),
        ] {
            if let Ok(val) = config.get_float(key) {
                *field = val as f32;
            }
        }

        Ok(settings)
    }

    /// Copy safe for display: the API key is masked.
    pub fn redacted(&self) -> Self {
        Self {
            api_key: self.api_key.as_ref().map(|_| "********".to_string()),
            ..self.clone()
        }
    }

    /// Serialize settings to TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: e.to_string(),
        })
    }
}
