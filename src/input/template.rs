//! Rendering of the watched input file.

use crate::session::HistoryEntry;

/// Opening delimiter of the editable message region.
pub const REGION_START: &str = "<!-- BEGIN MESSAGE -->";
/// Closing delimiter of the editable message region.
pub const REGION_END: &str = "<!-- END MESSAGE -->";
/// Completion marker the human types to submit.
pub const MARKER: &str = "//SEND";

const HISTORY_HEADER: &str = "## Conversation history";
const SEPARATOR: &str = "----------------------------------------";

/// Build the full input file body for a new wait cycle.
///
/// Earlier messages come first (oldest at the top), then the instructions and
/// an empty message region ending in the marker template.
pub fn render(history: &[HistoryEntry]) -> String {
    let mut body = String::new();

    if !history.is_empty() {
        body.push_str(HISTORY_HEADER);
        body.push_str("\n\n");
        for entry in history {
            body.push_str(&entry.render());
            body.push('\n');
        }
        body.push('\n');
        body.push_str(SEPARATOR);
        body.push_str("\n\n");
    }

    body.push_str(&format!(
        "Write your message between the markers below.\n\
         Finish it with {MARKER} on the last line and save the file to send it.\n\
         \n\
         {REGION_START}\n\
         \n\
         {MARKER}\n\
         {REGION_END}\n"
    ));

    body
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(text: &str) -> HistoryEntry {
        HistoryEntry {
            timestamp: "2024-05-01T10:00:00.000Z".to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_render_without_history() {
        let body = render(&[]);
        assert!(!body.contains(HISTORY_HEADER));
        assert!(!body.contains(SEPARATOR));
        assert!(body.ends_with("<!-- BEGIN MESSAGE -->\n\n//SEND\n<!-- END MESSAGE -->\n"));
    }

    #[test]
    fn test_render_history_in_order() {
        let body = render(&[entry("a"), entry("b")]);

        let a = body.find("USER: a").unwrap();
        let b = body.find("USER: b").unwrap();
        let sep = body.find(SEPARATOR).unwrap();
        let region = body.find(REGION_START).unwrap();

        assert!(a < b);
        assert!(b < sep);
        assert!(sep < region);
        assert!(body.starts_with(HISTORY_HEADER));
    }
}
