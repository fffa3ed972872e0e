//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the snippet tool implementations.
use crate::tools::snippet::{
    SnippetCreateParams, SnippetDeleteParams, SnippetGetParams, create_impl, delete_impl, get_impl, sweep_impl,
};

use binp_core::SnippetService;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for binp.
#[derive(Clone)]
pub struct BinpServer {
    service: SnippetService,
    max_text_bytes: usize,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl BinpServer {
    /// Create a new server handler around a wired snippet service.
    pub fn new(service: SnippetService, max_text_bytes: usize) -> Self {
        Self { service, max_text_bytes, tool_router: Self::tool_router() }
    }

    /// Store a new text snippet.
    #[tool(
        description = "Store a text snippet. Returns the snippet with its id. Optional language tag, expiry (1m, 1h, 1d, 1w, 30d, never) and burn_after_read."
    )]
    async fn snippet_create(&self, params: Parameters<SnippetCreateParams>) -> Result<CallToolResult, McpError> {
        create_impl(&self.service, self.max_text_bytes, params.0).await
    }

    /// Read a snippet by id.
    #[tool(
        description = "Read a snippet by id. Expired snippets are not found. Burn-after-read snippets are deleted by this read."
    )]
    async fn snippet_get(&self, params: Parameters<SnippetGetParams>) -> Result<CallToolResult, McpError> {
        get_impl(&self.service, params.0).await
    }

    /// Delete a snippet by id.
    #[tool(description = "Delete a snippet by id. Deleting a missing snippet is not an error.")]
    async fn snippet_delete(&self, params: Parameters<SnippetDeleteParams>) -> Result<CallToolResult, McpError> {
        delete_impl(&self.service, params.0).await
    }

    /// Remove all expired snippets now.
    #[tool(description = "Remove every expired snippet immediately. Returns the number removed.")]
    async fn snippet_sweep(&self) -> Result<CallToolResult, McpError> {
        sweep_impl(&self.service).await
    }
}

impl ServerHandler for BinpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "binp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some("Time-limited text snippet store. Snippets expire and may burn after one read.".into()),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
