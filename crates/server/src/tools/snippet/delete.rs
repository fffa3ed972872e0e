//! snippet_delete tool implementation.

use binp_core::SnippetService;
use rmcp::ErrorData as McpError;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::json_result;

/// Parameters for the snippet_delete tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SnippetDeleteParams {
    pub id: String,
}

/// Output from the snippet_delete tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SnippetDeleteOutput {
    /// False when nothing was stored under the id. Deleting twice is not an error.
    pub deleted: bool,
}

/// Implementation of the snippet_delete tool.
pub async fn delete_impl(service: &SnippetService, params: SnippetDeleteParams) -> Result<CallToolResult, McpError> {
    let deleted = service.delete(&params.id).await?;
    json_result(&SnippetDeleteOutput { deleted })
}
