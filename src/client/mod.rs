//! GitHub client: owns the executor, the `gh` gate and the temp workspace
//!
//! A [`GithubClient`] is the entry point for every operation. Repository
//! scoped work goes through [`RepoHandle`](crate::fetch::RepoHandle), obtained
//! with [`GithubClient::repo`] or [`GithubClient::resolve_repo`].

mod account;
mod provision;

pub use account::Organization;
pub use provision::{CreateRepoOptions, PushOptions};

use crate::config::{Backend, ClientConfig};
use crate::error::{Error, Result};
use crate::exec::process::git;
use crate::exec::{CommandOutput, CommandRunner, HttpFetcher, Invocation, ProcessRunner};
use crate::fetch::{RepoHandle, TempWorkspace};
use crate::reference::{split_full_name, RepoReference};
use crate::tooling::{GhGate, GhLocator};
use serde::Deserialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct GithubClient {
    config: ClientConfig,
    runner: Arc<dyn CommandRunner>,
    http: HttpFetcher,
    gate: GhGate,
    workspace: TempWorkspace,
}

impl std::fmt::Debug for GithubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubClient")
            .field("backend", &self.config.backend)
            .field("fetch_strategy", &self.config.fetch_strategy)
            .field("has_token", &self.config.token.is_some())
            .field("gh_verified", &self.gate.is_verified())
            .field("temp_root", &self.workspace.root())
            .finish()
    }
}

impl GithubClient {
    /// Client that spawns real processes. `GITHUB_TOKEN` fills in a missing token.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let runner = Arc::new(ProcessRunner::new(config.timeout()));
        Self::with_runner(config.with_env_token(), runner)
    }

    /// Client with a caller-supplied command runner. The config is used as-is.
    pub fn with_runner(config: ClientConfig, runner: Arc<dyn CommandRunner>) -> Result<Self> {
        let http = HttpFetcher::new(config.timeout())?;
        let locator = match &config.gh_path {
            Some(path) => GhLocator::Fixed(path.clone()),
            None => GhLocator::SearchPath,
        };
        let gate = GhGate::new(locator, config.host.clone());
        let workspace = match &config.temp_root {
            Some(root) => TempWorkspace::new(root),
            None => TempWorkspace::default(),
        };
        Ok(Self { config, runner, http, gate, workspace })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn workspace(&self) -> &TempWorkspace {
        &self.workspace
    }

    pub(crate) fn http(&self) -> &HttpFetcher {
        &self.http
    }

    pub(crate) fn token(&self) -> Option<&str> {
        self.config.token.as_deref().filter(|t| !t.is_empty())
    }

    /// Path to a `gh` authenticated for the configured host.
    pub fn require_gh(&self) -> Result<PathBuf> {
        self.gate.require(self.runner.as_ref())
    }

    /// Path to a `gh` authenticated for `host`.
    pub fn require_gh_for(&self, host: &str) -> Result<PathBuf> {
        self.gate.require_host(self.runner.as_ref(), host)
    }

    pub(crate) fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        self.runner.run(invocation)
    }

    /// Run `gh <args>` after the gate; non-zero exits are returned, not raised.
    pub(crate) fn gh<I, S>(&self, args: I) -> Result<CommandOutput>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let gh = self.require_gh()?;
        self.run(&Invocation::new(gh).args(args))
    }

    /// Like [`gh`](Self::gh), but checks authentication for `host`.
    pub(crate) fn gh_for<I, S>(&self, host: &str, args: I) -> Result<CommandOutput>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let gh = self.require_gh_for(host)?;
        self.run(&Invocation::new(gh).args(args))
    }

    /// Run `git <args>` and turn a non-zero exit into `OperationFailed`.
    pub(crate) fn git_checked<I, S>(
        &self,
        operation: &str,
        args: I,
        cwd: Option<&Path>,
    ) -> Result<CommandOutput>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let output = self.run(&git(args, cwd))?;
        if !output.success() {
            return Err(Error::failed(operation, output.failure_detail()));
        }
        Ok(output)
    }

    /// Bind a reference (and optional branch) to repository operations.
    /// No network access; `None` branch means the remote default branch.
    pub fn repo(&self, reference: &str, branch: Option<&str>) -> Result<RepoHandle<'_>> {
        let parsed = RepoReference::parse(reference)?;
        Ok(RepoHandle::new(self, parsed, normalize_branch(branch)))
    }

    /// Like [`repo`](Self::repo), but asks `gh repo view` for the canonical
    /// name and default branch. Any failure falls back to the parsed reference.
    pub fn resolve_repo(&self, reference: &str, branch: Option<&str>) -> Result<RepoHandle<'_>> {
        let parsed = RepoReference::parse(reference)?;
        let branch = normalize_branch(branch);
        if branch.is_some() || self.config.backend == Backend::Git {
            return Ok(RepoHandle::new(self, parsed, branch));
        }

        match self.view_repo(parsed.host(), reference.trim()) {
            Ok(view) => {
                let resolved = view
                    .name_with_owner
                    .as_deref()
                    .and_then(|full| split_full_name(full).ok())
                    .and_then(|(owner, name)| {
                        RepoReference::from_parts(parsed.host(), &owner, &name, parsed.protocol())
                            .ok()
                    })
                    .unwrap_or(parsed);
                tracing::debug!(
                    "Resolved {} on branch {:?}",
                    resolved.full_name(),
                    view.branch.as_deref()
                );
                Ok(RepoHandle::new(self, resolved, normalize_branch(view.branch.as_deref())))
            }
            Err(e) => {
                tracing::debug!("Using parsed reference; gh repo view failed: {}", e);
                Ok(RepoHandle::new(self, parsed, None))
            }
        }
    }

    fn view_repo(&self, host: &str, reference: &str) -> Result<RepoView> {
        let output = self.gh_for(host, [
            "repo",
            "view",
            reference,
            "--json",
            "nameWithOwner,defaultBranchRef",
            "--jq",
            "{name_with_owner: .nameWithOwner, branch: .defaultBranchRef.name}",
        ])?;
        if !output.success() || output.stdout.is_empty() {
            return Err(Error::failed("gh repo view", output.failure_detail()));
        }
        Ok(serde_json::from_slice(&output.stdout)?)
    }
}

#[derive(Debug, Deserialize)]
struct RepoView {
    name_with_owner: Option<String>,
    branch: Option<String>,
}

fn normalize_branch(branch: Option<&str>) -> Option<String> {
    branch.map(str::trim).filter(|b| !b.is_empty()).map(str::to_string)
}
