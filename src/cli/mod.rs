//! Command-line interface for gh-fetch
//!
//! Each subcommand loads the client config (file, then environment, then
//! flags) and drives one library operation.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod account;
mod clone;
mod fetch;
mod provision;
mod resolve;
mod utils;

use utils::ClientArgs;

/// Resolve GitHub references, clone repositories and fetch single files
#[derive(Parser)]
#[command(name = "gh-fetch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    client: ClientArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a repository reference and print its canonical forms
    Resolve(resolve::ResolveArgs),

    /// Clone a repository into a directory (a kept temp dir by default)
    Clone(clone::CloneArgs),

    /// Fetch a single file from a repository
    Fetch(fetch::FetchArgs),

    /// Create a repository on GitHub
    Create(provision::CreateArgs),

    /// Commit a local directory and push it as the initial commit
    Push(provision::PushArgs),

    /// Print the login of the authenticated gh user
    Whoami,

    /// List organizations of the authenticated gh user
    Orgs(account::OrgsArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Commands::Resolve(args) => resolve::run(args, &cli.client),
        Commands::Clone(args) => clone::run(args, &cli.client),
        Commands::Fetch(args) => fetch::run(args, &cli.client),
        Commands::Create(args) => provision::run_create(args, &cli.client),
        Commands::Push(args) => provision::run_push(args, &cli.client),
        Commands::Whoami => account::run_whoami(&cli.client),
        Commands::Orgs(args) => account::run_orgs(args, &cli.client),
    }
}
