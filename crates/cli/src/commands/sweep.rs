//! Sweep command

use std::io::Write;

use binp_core::SnippetService;

pub async fn execute(service: &SnippetService, out: &mut impl Write) -> anyhow::Result<()> {
    let removed = service.sweep_expired().await?;
    writeln!(out, "removed {removed} expired snippets")?;
    Ok(())
}
