//! Error types for Humanloop.

use thiserror::Error;

/// Library-level error type for Humanloop operations.
#[derive(Error, Debug)]
pub enum HumanloopError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("File watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("Editor launch failed: {0}")]
    EditorLaunch(String),

    #[error("A wait for user input is already in progress")]
    WaitInProgress,

    #[error("File watch closed before a message was submitted")]
    WatchClosed,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Humanloop operations.
pub type Result<T> = std::result::Result<T, HumanloopError>;
