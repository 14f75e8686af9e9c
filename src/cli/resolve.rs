//! Resolve command implementation

use anyhow::Result;
use clap::Args;
use gh_fetch::RepoReference;

use super::utils::ClientArgs;

#[derive(Args)]
pub struct ResolveArgs {
    /// SSH URL, HTTPS URL or owner/repo
    #[arg(value_name = "REFERENCE")]
    pub reference: String,

    /// Ask gh for the canonical name and default branch
    #[arg(long)]
    pub remote: bool,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ResolveArgs, client_args: &ClientArgs) -> Result<()> {
    // Local resolution never touches the network.
    let (reference, branch) = if args.remote {
        let client = client_args.build_client()?;
        let handle = client.resolve_repo(&args.reference, None)?;
        (handle.reference().clone(), handle.branch().map(str::to_string))
    } else {
        (RepoReference::parse(&args.reference)?, None)
    };

    if args.json {
        let value = serde_json::json!({
            "host": reference.host(),
            "owner": reference.owner(),
            "name": reference.name(),
            "full_name": reference.full_name(),
            "ssh_url": reference.ssh_url(),
            "https_url": reference.https_url(),
            "default_branch": branch,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("full_name: {}", reference.full_name());
    println!("host:      {}", reference.host());
    println!("ssh_url:   {}", reference.ssh_url());
    println!("https_url: {}", reference.https_url());
    if let Some(branch) = branch {
        println!("branch:    {branch}");
    }
    Ok(())
}
