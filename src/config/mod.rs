//! Configuration module for Humanloop.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{EditorSettings, GeneralSettings, InputSettings, Settings};
