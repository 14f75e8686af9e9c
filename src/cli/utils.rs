//! Shared CLI utilities.

use anyhow::{Context, Result};
use clap::Args;
use gh_fetch::config::load_config;
use gh_fetch::{Backend, FetchStrategy, GithubClient};
use std::path::PathBuf;

/// Client settings accepted by every subcommand.
#[derive(Args)]
pub struct ClientArgs {
    /// Config file (default: gh-fetch.toml / .gh-fetch.toml / gh-fetch.y[a]ml in the working directory)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Tool used for clones: gh or git
    #[arg(long, global = true, value_name = "BACKEND")]
    pub backend: Option<Backend>,

    /// File fetch strategy: auto, raw, contents-api, sparse or gh-api
    #[arg(long, global = true, value_name = "STRATEGY")]
    pub strategy: Option<FetchStrategy>,

    /// Timeout for each command or HTTP request, in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Token for HTTP fetches
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Directory for temporary clones
    #[arg(long, global = true, value_name = "DIR")]
    pub temp_root: Option<PathBuf>,
}

impl ClientArgs {
    /// Load the config file and apply flag overrides on top.
    pub fn build_client(&self) -> Result<GithubClient> {
        let cwd = std::env::current_dir().context("Failed to read working directory")?;
        let mut config = load_config(&cwd, self.config.as_deref())?;

        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        if let Some(strategy) = self.strategy {
            config.fetch_strategy = strategy;
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        if let Some(token) = self.token.as_deref().filter(|t| !t.trim().is_empty()) {
            config.token = Some(token.to_string());
        }
        if let Some(root) = &self.temp_root {
            config.temp_root = Some(root.clone());
        }

        GithubClient::new(config).context("Failed to initialise GitHub client")
    }
}

/// Parse a comma-separated string into a `Vec<String>`, trimming whitespace and
/// discarding empty segments.  Returns `None` when `value` is `None`.
pub fn parse_csv(value: &Option<String>) -> Option<Vec<String>> {
    value.as_ref().map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| part.to_string())
            .collect::<Vec<_>>()
    })
}
