//! Structured errors for the binp tool surface.
//!
//! Storage failures arrive as `binp_core::Error` and convert on their own;
//! these cover what the presentation layer rejects or reports itself.

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Structured errors for the binp MCP server.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Invalid input parameters (e.g., empty text, unknown language).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// No live snippet with this id. Expired and burned snippets land here too.
    #[error("SNIPPET_NOT_FOUND: {0}")]
    NotFound(String),

    /// Tool output could not be serialized.
    #[error("INTERNAL: {0}")]
    Internal(String),
}

impl From<ToolError> for McpError {
    fn from(err: ToolError) -> Self {
        let (code, message) = match &err {
            ToolError::InvalidInput(msg) => (-32602, msg.clone()),
            ToolError::NotFound(id) => (-32001, format!("Snippet not found: {id}")),
            ToolError::Internal(msg) => (-32603, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}

/// Render a tool output as pretty JSON text content.
pub fn json_result<T: serde::Serialize>(output: &T) -> Result<rmcp::model::CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| ToolError::Internal(format!("Failed to serialize output: {e}")))?;
    Ok(rmcp::model::CallToolResult::success(vec![rmcp::model::Content::text(json)]))
}
