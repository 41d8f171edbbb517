//! Process-scoped session context.
//!
//! A single [`Session`] is built at startup and shared (`Arc<Session>`) by the
//! MCP server and the wait engine until the process exits. It owns the watched
//! input file path and the in-memory conversation history.

mod history;

pub use history::{ConversationHistory, HistoryEntry};

use crate::config::Settings;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// The one conversation served by this process.
#[derive(Debug)]
pub struct Session {
    input_file: PathBuf,
    history: RwLock<ConversationHistory>,
}

impl Session {
    /// Create a session bound to a fixed input file path.
    pub fn new(input_file: impl Into<PathBuf>) -> Self {
        Self {
            input_file: input_file.into(),
            history: RwLock::new(ConversationHistory::new()),
        }
    }

    /// Create a session from settings, resolving the input file path once.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.input_file())
    }

    /// Path of the watched input file.
    pub fn input_file(&self) -> &Path {
        &self.input_file
    }

    /// Snapshot of the history entries.
    pub async fn history(&self) -> Vec<HistoryEntry> {
        self.history.read().await.entries().to_vec()
    }

    /// Record a submitted message, returning the new entry.
    pub async fn record(&self, text: String) -> HistoryEntry {
        self.history.write().await.push_now(text)
    }
}
