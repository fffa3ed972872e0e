//! binp CLI
//!
//! Local command-line access to the snippet store.

use std::path::PathBuf;

use anyhow::Context;
use binp_core::{AppConfig, SnippetService};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "binp")]
#[command(about = "binp - time-limited text snippets", long_about = None)]
struct Cli {
    /// SQLite database path (overrides BINP_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create a new snippet and print its id
    Create(commands::create::CreateArgs),
    /// Print a snippet
    Get(commands::get::GetArgs),
    /// Delete a snippet
    Delete(commands::delete::DeleteArgs),
    /// Remove every expired snippet
    Sweep,
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::load().context("loading configuration")?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    tracing::debug!(db_path = %config.db_path.display(), "opening snippet store");
    let service = SnippetService::from_config(&config)
        .await
        .with_context(|| format!("opening snippet store at {}", config.db_path.display()))?;

    let mut out = std::io::stdout().lock();
    match cli.command {
        Commands::Create(args) => commands::create::execute(&service, config.max_text_bytes, args, &mut out).await,
        Commands::Get(args) => commands::get::execute(&service, args, &mut out).await,
        Commands::Delete(args) => commands::delete::execute(&service, args, &mut out).await,
        Commands::Sweep => commands::sweep::execute(&service, &mut out).await,
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
