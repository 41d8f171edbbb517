//! Append-only conversation history.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// A previously submitted user message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub timestamp: String,
    pub text: String,
}

impl HistoryEntry {
    /// Render as a single history line for the input file.
    pub fn render(&self) -> String {
        format!("[{}] USER: {}", self.timestamp, self.text)
    }
}

/// Messages in submission order. Entries are never removed or changed.
#[derive(Debug, Default)]
pub struct ConversationHistory {
    entries: Vec<HistoryEntry>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message stamped with the current UTC time.
    pub fn push_now(&mut self, text: String) -> HistoryEntry {
        let entry = HistoryEntry {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            text,
        };
        self.entries.push(entry.clone());
        entry
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
