//! Delete command

use std::io::Write;

use binp_core::SnippetService;
use clap::Args;

#[derive(Debug, Args)]
pub struct DeleteArgs {
    pub id: String,
}

pub async fn execute(service: &SnippetService, args: DeleteArgs, out: &mut impl Write) -> anyhow::Result<()> {
    if service.delete(&args.id).await? {
        writeln!(out, "deleted {}", args.id)?;
    } else {
        writeln!(out, "no snippet {}", args.id)?;
    }
    Ok(())
}
