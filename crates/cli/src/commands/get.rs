//! Get command

use std::io::Write;

use anyhow::bail;
use binp_core::SnippetService;
use clap::Args;

#[derive(Debug, Args)]
pub struct GetArgs {
    pub id: String,

    /// Print the full snippet record as JSON
    #[arg(short, long)]
    pub json: bool,
}

pub async fn execute(service: &SnippetService, args: GetArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let Some(snippet) = service.get_by_id(&args.id).await? else {
        bail!("Snippet not found");
    };

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &snippet)?;
        writeln!(out)?;
    } else {
        writeln!(out, "{}", snippet.text)?;
    }
    Ok(())
}
