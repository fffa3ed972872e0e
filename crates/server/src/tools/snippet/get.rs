//! snippet_get tool implementation.
//!
//! Reading a burn-after-read snippet through this tool consumes it.

use binp_core::{Snippet, SnippetService};
use rmcp::ErrorData as McpError;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ToolError, json_result};

/// Parameters for the snippet_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SnippetGetParams {
    /// The snippet id returned by snippet_create.
    pub id: String,
}

/// Output from the snippet_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SnippetGetOutput {
    pub snippet: Snippet,
}

/// Implementation of the snippet_get tool.
pub async fn get_impl(service: &SnippetService, params: SnippetGetParams) -> Result<CallToolResult, McpError> {
    let Some(snippet) = service.get_by_id(&params.id).await? else {
        tracing::warn!(id = %params.id, "snippet not found");
        return Err(ToolError::NotFound(params.id).into());
    };

    json_result(&SnippetGetOutput { snippet })
}
