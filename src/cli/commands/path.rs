//! Path command implementation.

use crate::config::Settings;
use anyhow::Result;

/// Print the watched input file path.
pub fn run_path(settings: &Settings) -> Result<()> {
    println!("{}", settings.input_file().display());
    Ok(())
}
