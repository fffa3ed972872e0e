//! binp MCP server entry point.
//!
//! Boots the snippet service, starts the expiration sweeper, and serves
//! the snippet tools on stdio. Logging goes to stderr to avoid interfering with
//! the JSON-RPC protocol on stdout.

use anyhow::{Context, Result};
use binp_core::{AppConfig, SnippetService, Sweeper};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod error;
mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load().context("loading configuration")?;
    let service = SnippetService::from_config(&config)
        .await
        .with_context(|| format!("opening snippet store at {}", config.db_path.display()))?;

    let sweeper = Sweeper::spawn(service.clone(), config.sweep_interval());

    tracing::info!(db_path = %config.db_path.display(), "starting binp server on stdio transport");

    let handler = handler::BinpServer::new(service, config.max_text_bytes);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    tokio::select! {
        result = server.waiting() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupt received, shutting down");
        }
    }

    sweeper.shutdown().await;

    Ok(())
}
