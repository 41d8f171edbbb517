//! MCP (Model Context Protocol) server for Humanloop.
//!
//! Exposes the wait engine to AI assistants as tools.
//! Implements JSON-RPC 2.0 over stdio.

mod protocol;
mod server;
mod tools;

pub use server::McpServer;
