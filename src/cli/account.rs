//! Whoami and orgs command implementations

use anyhow::Result;
use clap::Args;

use super::utils::ClientArgs;

#[derive(Args)]
pub struct OrgsArgs {
    /// Print the full JSON objects, one per line
    #[arg(long)]
    pub json: bool,
}

pub fn run_whoami(client_args: &ClientArgs) -> Result<()> {
    let client = client_args.build_client()?;
    println!("{}", client.authenticated_user_login()?);
    Ok(())
}

pub fn run_orgs(args: OrgsArgs, client_args: &ClientArgs) -> Result<()> {
    let client = client_args.build_client()?;
    for org in client.user_orgs()? {
        if args.json {
            println!("{}", serde_json::to_string(&org)?);
        } else {
            println!("{}", org.login);
        }
    }
    Ok(())
}
