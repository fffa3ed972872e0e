//! snippet_create tool implementation.
//!
//! Validates the request strictly, then stores the snippet.

use binp_core::{ExpiryClass, Language, Snippet, SnippetService};
use rmcp::ErrorData as McpError;
use rmcp::model::CallToolResult;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ToolError, json_result};

/// Parameters for the snippet_create tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SnippetCreateParams {
    /// The snippet body.
    pub text: String,

    /// Language tag used for highlighting (default: "txt").
    #[serde(default = "default_language")]
    pub language: String,

    /// Lifetime: "1m", "1h", "1d", "1w", "30d" or "never" (default: "1h").
    #[serde(default = "default_expiry")]
    pub expiry: String,

    /// Delete the snippet after it is read once.
    #[serde(default)]
    pub burn_after_read: bool,
}

fn default_language() -> String {
    Language::Plaintext.tag().into()
}

/// An omitted expiry means one hour; unknown strings are rejected rather than
/// falling back to `ExpiryClass::default()`.
fn default_expiry() -> String {
    ExpiryClass::OneHour.as_str().into()
}

/// Output from the snippet_create tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SnippetCreateOutput {
    pub snippet: Snippet,
}

fn options<T: ToString>(all: impl IntoIterator<Item = T>) -> String {
    all.into_iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ")
}

/// Implementation of the snippet_create tool.
pub async fn create_impl(
    service: &SnippetService, max_text_bytes: usize, params: SnippetCreateParams,
) -> Result<CallToolResult, McpError> {
    if params.text.is_empty() {
        return Err(ToolError::InvalidInput("text must not be empty".into()).into());
    }
    if params.text.len() > max_text_bytes {
        return Err(ToolError::InvalidInput(format!("text exceeds {max_text_bytes} bytes")).into());
    }

    let language: Language = params.language.parse().map_err(|_| {
        ToolError::InvalidInput(format!("Invalid language. Options: {}", options(Language::ALL)))
    })?;
    let expiry: ExpiryClass = params.expiry.parse().map_err(|_| {
        ToolError::InvalidInput(format!("Invalid expiry. Options: {}", options(ExpiryClass::ALL)))
    })?;

    let snippet = service
        .create(params.text, params.burn_after_read, expiry, language)
        .await?;

    json_result(&SnippetCreateOutput { snippet })
}
