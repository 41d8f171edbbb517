//! MCP command implementation.

use crate::config::Settings;
use crate::input::launcher_from_settings;
use crate::mcp::McpServer;
use crate::session::Session;
use anyhow::Result;
use std::sync::Arc;

/// Run the MCP server.
pub async fn run_mcp(settings: Settings) -> Result<()> {
    let session = Arc::new(Session::from_settings(&settings));
    let launcher = launcher_from_settings(&settings.editor);
    let server = McpServer::new(session, launcher);
    server.run().await
}
