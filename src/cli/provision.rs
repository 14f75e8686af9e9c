//! Create and push command implementations

use anyhow::{Context, Result};
use clap::Args;
use gh_fetch::reference::split_full_name;
use gh_fetch::{CreateRepoOptions, GithubClient, PushOptions};
use std::path::PathBuf;

use super::utils::ClientArgs;

#[derive(Args)]
pub struct CreateArgs {
    /// owner/name, or just name to create under the authenticated user
    #[arg(value_name = "REPO")]
    pub repo: String,

    /// Create a private repository
    #[arg(long)]
    pub private: bool,

    /// Repository description
    #[arg(short, long)]
    pub description: Option<String>,

    /// Local directory to use as the repository source
    #[arg(long, value_name = "DIR")]
    pub source: Option<String>,
}

#[derive(Args)]
pub struct PushArgs {
    /// Local project directory
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// owner/name, or just name to push under the authenticated user
    #[arg(value_name = "REPO")]
    pub repo: String,

    /// Branch to push
    #[arg(short, long, default_value = "main")]
    pub branch: String,

    /// Commit message
    #[arg(short, long, default_value = "init commit")]
    pub message: String,
}

pub fn run_create(args: CreateArgs, client_args: &ClientArgs) -> Result<()> {
    let client = client_args.build_client()?;
    let (owner, name) = owner_and_name(&client, &args.repo)?;
    let options = CreateRepoOptions {
        private: args.private,
        description: args.description,
        source: args.source,
    };

    client.create_repo(&owner, &name, &options)?;
    println!("Created {owner}/{name}");
    Ok(())
}

pub fn run_push(args: PushArgs, client_args: &ClientArgs) -> Result<()> {
    let client = client_args.build_client()?;
    let (owner, name) = owner_and_name(&client, &args.repo)?;
    let options = PushOptions { branch: args.branch, message: args.message };

    client
        .push_initial_commit(&args.path, &owner, &name, &options)
        .with_context(|| format!("Failed to push {} to {owner}/{name}", args.path.display()))?;
    println!("Pushed {} to {owner}/{name} ({})", args.path.display(), options.branch);
    Ok(())
}

/// A bare name is owned by the authenticated user.
fn owner_and_name(client: &GithubClient, repo: &str) -> Result<(String, String)> {
    if repo.contains('/') {
        return Ok(split_full_name(repo)?);
    }
    let owner = client.authenticated_user_login()?;
    Ok((owner, repo.trim().to_string()))
}
