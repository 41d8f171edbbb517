//! CLI module for Humanloop.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Humanloop - human-in-the-loop input for AI assistants
///
/// An MCP server whose single tool blocks until you write a message into a
/// watched file and end it with //SEND.
#[derive(Parser, Debug)]
#[command(name = "humanloop")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "HUMANLOOP_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the MCP server on stdio (default)
    Mcp,

    /// Print the path of the watched input file
    Path,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
