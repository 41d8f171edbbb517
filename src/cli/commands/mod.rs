//! CLI command implementations.

mod config;
mod mcp;
mod path;

pub use config::run_config;
pub use mcp::run_mcp;
pub use path::run_path;
