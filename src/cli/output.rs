//! CLI output formatting utilities.

use console::style;

/// Output helper for CLI formatting.
///
/// Everything goes to stderr so stdout stays clean for piping.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        eprintln!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }
}
