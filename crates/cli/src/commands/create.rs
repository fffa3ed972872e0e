//! Create command

use std::io::{Read, Write};

use anyhow::{Context, bail};
use binp_core::{ExpiryClass, Language, SnippetService};
use clap::Args;

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Snippet text; read from stdin when omitted
    pub text: Option<String>,

    /// Language tag (txt, bash, css, dockerfile, go, html, javascript, json, lua, nix, python, rust, sql, toml, typescript, yaml)
    #[arg(short, long, default_value = "txt")]
    pub language: String,

    /// Expiry (1m, 1h, 1d, 1w, 30d, never)
    #[arg(short, long, default_value = "1h")]
    pub expiry: String,

    /// Burn the snippet after reading it once
    #[arg(short, long = "burn-after-read")]
    pub burn: bool,
}

pub async fn execute(
    service: &SnippetService, max_text_bytes: usize, args: CreateArgs, out: &mut impl Write,
) -> anyhow::Result<()> {
    let text = match args.text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).context("reading snippet from stdin")?;
            buf
        }
    };

    if text.is_empty() {
        bail!("snippet text must not be empty");
    }
    if text.len() > max_text_bytes {
        bail!("snippet text exceeds {max_text_bytes} bytes");
    }

    let language: Language = args
        .language
        .parse()
        .with_context(|| format!("Invalid language. Valid values are {}", join(Language::ALL)))?;
    let expiry: ExpiryClass = args
        .expiry
        .parse()
        .with_context(|| format!("Invalid expiry. Valid values are {}", join(ExpiryClass::ALL)))?;

    let snippet = service.create(text, args.burn, expiry, language).await?;
    writeln!(out, "{}", snippet.id)?;
    Ok(())
}

fn join<T: ToString>(all: impl IntoIterator<Item = T>) -> String {
    all.into_iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ")
}
