//! Subcommand implementations.
//!
//! Each command writes its result to the supplied writer so tests can capture it.

pub mod create;
pub mod delete;
pub mod get;
pub mod sweep;

#[cfg(test)]
pub(crate) async fn test_service() -> binp_core::SnippetService {
    binp_core::SnippetService::builder(binp_core::SnippetDb::open_in_memory().await.unwrap()).build()
}
