//! snippet_sweep tool implementation.
//!
//! Runs the same expiration sweep the background ticker runs, on demand.

use binp_core::SnippetService;
use rmcp::ErrorData as McpError;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::json_result;

/// Output from the snippet_sweep tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SnippetSweepOutput {
    /// Number of expired snippets removed.
    pub removed: usize,
}

/// Implementation of the snippet_sweep tool.
pub async fn sweep_impl(service: &SnippetService) -> Result<CallToolResult, McpError> {
    let removed = service.sweep_expired().await?;
    json_result(&SnippetSweepOutput { removed })
}
