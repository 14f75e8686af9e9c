//! Client configuration
//!
//! Settings come from a config file, the environment and CLI flags, with
//! precedence CLI > Env > File > Defaults.

pub mod loader;

pub use loader::load_config;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_RAW_BASE_URL: &str = "https://raw.githubusercontent.com";
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Which tool performs clones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// `gh repo clone`, gated on `gh auth status`.
    #[default]
    Gh,
    /// Plain `git clone`.
    Git,
}

/// How single files are fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FetchStrategy {
    /// Raw endpoint for HTTPS and bare references, sparse checkout for SSH.
    #[default]
    Auto,
    Raw,
    ContentsApi,
    Sparse,
    GhApi,
}

impl std::str::FromStr for FetchStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "raw" => Ok(Self::Raw),
            "contents-api" | "contents" => Ok(Self::ContentsApi),
            "sparse" => Ok(Self::Sparse),
            "gh-api" | "gh" => Ok(Self::GhApi),
            other => Err(format!("Invalid fetch strategy '{other}'")),
        }
    }
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gh" => Ok(Self::Gh),
            "git" => Ok(Self::Git),
            other => Err(format!("Invalid backend '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Per-invocation timeout for processes and HTTP requests.
    pub timeout_secs: u64,
    /// Bearer token for HTTP fetches. Falls back to `GITHUB_TOKEN`.
    pub token: Option<String>,
    pub backend: Backend,
    pub fetch_strategy: FetchStrategy,
    /// Root for temp directories; the system temp dir when unset.
    pub temp_root: Option<PathBuf>,
    pub raw_base_url: String,
    pub api_base_url: String,
    /// Host used for `gh auth status`.
    pub host: String,
    /// Default `git clone` arguments.
    pub clone_args: Vec<String>,
    /// Explicit `gh` binary; `PATH` is searched when unset.
    pub gh_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            token: None,
            backend: Backend::default(),
            fetch_strategy: FetchStrategy::default(),
            temp_root: None,
            raw_base_url: DEFAULT_RAW_BASE_URL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            host: crate::reference::DEFAULT_HOST.to_string(),
            clone_args: vec!["--depth=1".to_string()],
            gh_path: None,
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Fill `token` from `GITHUB_TOKEN` when no token was configured.
    pub fn with_env_token(mut self) -> Self {
        if self.token.as_deref().map_or(true, str::is_empty) {
            self.token = std::env::var(TOKEN_ENV).ok().filter(|t| !t.trim().is_empty());
        }
        self
    }
}
