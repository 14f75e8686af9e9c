//! Clone command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use super::utils::{parse_csv, ClientArgs};

#[derive(Args)]
pub struct CloneArgs {
    /// SSH URL, HTTPS URL or owner/repo
    #[arg(value_name = "REFERENCE")]
    pub reference: String,

    /// Destination directory (default: a new temp directory that is kept)
    #[arg(value_name = "DEST")]
    pub dest: Option<PathBuf>,

    /// Branch to check out
    #[arg(short, long)]
    pub branch: Option<String>,

    /// Extra clone arguments, comma-separated (replaces the configured ones)
    #[arg(long, value_name = "ARGS", allow_hyphen_values = true)]
    pub clone_args: Option<String>,
}

pub fn run(args: CloneArgs, client_args: &ClientArgs) -> Result<()> {
    let client = client_args.build_client()?;
    let repo = client.repo(&args.reference, args.branch.as_deref())?;
    let clone_args = parse_csv(&args.clone_args);

    let cloned = repo
        .clone_repo(args.dest.as_deref(), clone_args.as_deref())
        .with_context(|| format!("Failed to clone {}", repo.reference().full_name()))?;

    println!("{}", cloned.keep().display());
    Ok(())
}
