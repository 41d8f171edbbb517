//! Configuration settings for Humanloop.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub input: InputSettings,
    pub editor: EditorSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Watched input file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    /// File name created inside the OS temp directory.
    pub file_name: String,
    /// Explicit path for the input file. Overrides `file_name` when set.
    pub path: Option<String>,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            file_name: "humanloop-input.md".to_string(),
            path: None,
        }
    }
}

/// Editor launch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Try to open the input file in an editor when a wait starts.
    pub enabled: bool,
    /// Flag passed so the editor reuses an already open window.
    pub reuse_window_flag: String,
    /// Editor programs to try, in order of preference.
    pub candidates: Vec<String>,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            reuse_window_flag: "--reuse-window".to_string(),
            candidates: vec![
                "cursor".to_string(),
                "code".to_string(),
                "codium".to_string(),
                "windsurf".to_string(),
            ],
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Render settings as pretty TOML.
    pub fn to_toml(&self) -> crate::error::Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| crate::error::HumanloopError::Config(e.to_string()))
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("humanloop")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Resolve the watched input file path.
    ///
    /// Uses the configured override when present, otherwise places
    /// `input.file_name` in the OS temp directory.
    pub fn input_file(&self) -> PathBuf {
        match self.input.path.as_deref() {
            Some(p) if !p.trim().is_empty() => Self::expand_path(p),
            _ => std::env::temp_dir().join(&self.input.file_name),
        }
    }
}
