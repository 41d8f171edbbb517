//! Humanloop - human-in-the-loop input for AI assistants
//!
//! An MCP server that lets an assistant pause and ask its human for input.
//! The human answers by editing a plain text file and ending the message
//! with `//SEND`.
//!
//! # Architecture
//!
//! - `mcp` - JSON-RPC 2.0 dispatcher over stdio
//! - `input` - the wait engine: file rendering, change watching, marker parsing
//! - `session` - the process-wide conversation context and its history
//! - `config` - configuration management
//! - `cli` - command line interface
//!
//! # Example
//!
//! ```rust,no_run
//! use humanloop::input::{NoEditor, WaitEngine};
//! use humanloop::session::Session;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let session = Arc::new(Session::new("/tmp/reply.md"));
//!     let engine = WaitEngine::new(session, Arc::new(NoEditor));
//!
//!     // Blocks until /tmp/reply.md is saved with a message ending in //SEND
//!     let message = engine.wait_for_user_input().await?;
//!     println!("User said: {}", message);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod mcp;
pub mod session;

pub use error::{HumanloopError, Result};
