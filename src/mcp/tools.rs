//! MCP tool definitions for Humanloop.

use super::protocol::{Tool, ToolCallResult};
use serde::Serialize;
use serde_json::json;

pub const WAIT_FOR_USER_INPUT: &str = "wait_for_user_input";
pub const GET_INPUT_FILE: &str = "get_input_file";

/// Get all available tools.
pub fn get_tools() -> Vec<Tool> {
    vec![
        Tool {
            name: WAIT_FOR_USER_INPUT.to_string(),
            description: "Wait for the user to write a message. \
                Opens the input file, blocks until the user saves a message ending with //SEND, \
                and returns that message. Earlier messages are shown in the file as history."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        },
        Tool {
            name: GET_INPUT_FILE.to_string(),
            description: "Get the path of the file the user edits to send messages."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        },
    ]
}

/// Outcome of a tool call, returned to the client as JSON text.
#[derive(Debug, Serialize)]
pub struct ToolResponse {
    pub status: ToolStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    Success,
    Error,
}

impl ToolResponse {
    pub fn user_message(text: String) -> Self {
        Self {
            status: ToolStatus::Success,
            user_message: Some(text),
            input_file: None,
            message: None,
        }
    }

    pub fn input_file(path: String) -> Self {
        Self {
            status: ToolStatus::Success,
            user_message: None,
            input_file: Some(path),
            message: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            status: ToolStatus::Error,
            user_message: None,
            input_file: None,
            message: Some(message),
        }
    }

    /// Wrap as a single text content item.
    pub fn into_call_result(self) -> serde_json::Result<ToolCallResult> {
        let text = serde_json::to_string_pretty(&self)?;
        Ok(match self.status {
            ToolStatus::Success => ToolCallResult::text(text),
            ToolStatus::Error => ToolCallResult::error(text),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::protocol::ToolContent;
    use serde_json::Value;

    #[test]
    fn test_catalog() {
        let tools = get_tools();
        let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec![WAIT_FOR_USER_INPUT, GET_INPUT_FILE]);
        for tool in &tools {
            assert_eq!(tool.input_schema["type"], "object");
            assert!(tool.input_schema["properties"].as_object().unwrap().is_empty());
        }
    }

    #[test]
    fn test_error_payload_text() {
        let result = ToolResponse::error("Unknown tool: nope".to_string())
            .into_call_result()
            .unwrap();
        assert_eq!(result.is_error, Some(true));

        let ToolContent::Text { text } = &result.content[0];
        let payload: Value = serde_json::from_str(text).unwrap();
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["message"], "Unknown tool: nope");
        assert!(payload.get("user_message").is_none());
    }
}
