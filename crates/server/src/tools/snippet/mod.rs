//! Snippet MCP tools.
//!
//! Thin adapters from tool parameters to `SnippetService` calls. All policy
//! (expiry, burn-after-read, cache coherence) lives in the core crate.

pub mod create;
pub mod delete;
pub mod get;
pub mod sweep;

pub use create::{SnippetCreateParams, create_impl};
pub use delete::{SnippetDeleteParams, delete_impl};
pub use get::{SnippetGetParams, get_impl};
pub use sweep::sweep_impl;
