//! Fetch command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use super::utils::ClientArgs;

#[derive(Args)]
pub struct FetchArgs {
    /// SSH URL, HTTPS URL or owner/repo
    #[arg(value_name = "REFERENCE")]
    pub reference: String,

    /// Path of the file inside the repository
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Branch to read from (default: the remote default branch)
    #[arg(short, long)]
    pub branch: Option<String>,

    /// Text encoding label, e.g. utf-8 or latin1 (default: detect)
    #[arg(short, long)]
    pub encoding: Option<String>,

    /// Write the raw bytes to this file instead of printing text
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub fn run(args: FetchArgs, client_args: &ClientArgs) -> Result<()> {
    let client = client_args.build_client()?;
    let repo = client.repo(&args.reference, args.branch.as_deref())?;
    let missing = || {
        anyhow::anyhow!("Could not fetch {} from {}", args.path, repo.reference().full_name())
    };

    match &args.output {
        Some(output) => {
            let bytes = repo.fetch_file_bytes(&args.path)?.ok_or_else(missing)?;
            std::fs::write(output, &bytes)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            eprintln!("Wrote {} bytes to {}", bytes.len(), output.display());
        }
        None => {
            let text =
                repo.fetch_file(&args.path, args.encoding.as_deref())?.ok_or_else(missing)?;
            print!("{text}");
        }
    }
    Ok(())
}
