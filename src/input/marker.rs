//! Completion marker detection and message extraction.

use regex::Regex;

/// Finds a submitted message in the raw input file content.
pub struct SubmissionParser {
    marker_at_end: Regex,
    region_start: Regex,
}

impl SubmissionParser {
    pub fn new() -> Self {
        // `//SEND`, optionally followed by the closing region delimiter, at the very end
        let marker_at_end = Regex::new(r"(?i)//send\s*(?:<!--\s*end\s+message\s*-->)?$")
            .expect("Invalid regex");
        let region_start =
            Regex::new(r"(?i)<!--\s*begin\s+message\s*-->").expect("Invalid regex");

        Self {
            marker_at_end,
            region_start,
        }
    }

    /// Extract the submitted message, if the content is a complete submission.
    ///
    /// Returns `None` while the human is still composing: the content is empty,
    /// does not end with the marker, or holds nothing but the marker.
    pub fn extract(&self, content: &str) -> Option<String> {
        let content = content.trim();
        if content.is_empty() {
            return None;
        }

        let marker = self.marker_at_end.find(content)?;
        let before = &content[..marker.start()];

        // Prefer the region opened last; fall back to everything before the marker
        let body = match self.region_start.find_iter(before).last() {
            Some(start) => &before[start.end()..],
            None => before,
        };

        let message = body.trim();
        if message.is_empty() {
            None
        } else {
            Some(message.to_string())
        }
    }
}

impl Default for SubmissionParser {
    fn default() -> Self {
        Self::new()
    }
}
