//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;
use std::path::Path;

/// Run the config command.
pub fn run_config(action: &ConfigAction, config_path: &Path, settings: &Settings) -> Result<()> {
    match action {
        ConfigAction::Show => {
            if !config_path.exists() {
                Output::info(&format!(
                    "No config file at {}; showing defaults",
                    config_path.display()
                ));
            }
            println!("{}", settings.to_toml()?);
        }

        ConfigAction::Path => {
            println!("{}", config_path.display());
            if !config_path.exists() {
                Output::warning("Config file does not exist yet.");
            }
        }
    }

    Ok(())
}
