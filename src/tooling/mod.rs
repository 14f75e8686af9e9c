//! GitHub CLI availability and authentication gate
//!
//! `gh` is resolved and version-checked once per [`GhGate`]; authentication
//! is checked once per host. Two threads racing through the first check both
//! run it, which is harmless.

use crate::error::{Error, Result};
use crate::exec::{CommandRunner, Invocation};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock, PoisonError};

pub const GH_INSTALL_GUIDE: &str = "GitHub CLI (gh) is required for repository access.\n\
Install instructions: https://cli.github.com/\n\
Linux command (Ubuntu/Debian): sudo apt install gh\n\
Arch Linux: sudo pacman -S github-cli";

/// Login instructions for `host`.
pub fn login_guide(host: &str) -> String {
    format!(
        "GitHub CLI authentication is required.\n\
         Command to copy:\n\
         gh auth login --hostname {host} --git-protocol https --web\n\
         Then run:\n\
         gh auth status --hostname {host}"
    )
}

/// How the `gh` binary is located.
#[derive(Debug, Clone)]
pub enum GhLocator {
    /// Search `PATH`.
    SearchPath,
    /// Use this path without searching.
    Fixed(PathBuf),
}

/// Caches successful `gh` verifications for the lifetime of its owner.
#[derive(Debug)]
pub struct GhGate {
    locator: GhLocator,
    host: String,
    path: OnceLock<PathBuf>,
    verified_hosts: Mutex<HashSet<String>>,
}

impl GhGate {
    /// `host` is the default host checked by [`require`](Self::require).
    pub fn new(locator: GhLocator, host: impl Into<String>) -> Self {
        Self {
            locator,
            host: normalize_host(&host.into()),
            path: OnceLock::new(),
            verified_hosts: Mutex::new(HashSet::new()),
        }
    }

    /// Whether the default host has been verified.
    pub fn is_verified(&self) -> bool {
        self.is_host_verified(&self.host)
    }

    /// Verified `gh` path for the default host.
    pub fn require(&self, runner: &dyn CommandRunner) -> Result<PathBuf> {
        self.require_host(runner, &self.host)
    }

    /// Return the `gh` path once it is installed and authenticated for `host`.
    pub fn require_host(&self, runner: &dyn CommandRunner, host: &str) -> Result<PathBuf> {
        let host = normalize_host(host);
        if let Some(path) = self.path.get() {
            if self.is_host_verified(&host) {
                return Ok(path.clone());
            }
        }

        let gh = match self.path.get() {
            Some(path) => path.clone(),
            None => self.check_installed(runner)?,
        };

        let status = runner
            .run(&Invocation::new(&gh).args(["auth", "status", "--hostname", host.as_str()]))
            .map_err(|e| {
                Error::ToolingUnavailable(format!("{}\n\n{e}", login_guide(&host)))
            })?;
        if !status.success() {
            let detail = status.stderr_str();
            let guide = login_guide(&host);
            let message =
                if detail.is_empty() { guide } else { format!("{detail}\n\n{guide}") };
            return Err(Error::ToolingUnavailable(message));
        }

        tracing::debug!(gh = %gh.display(), host = %host, "gh verified");
        self.verified_hosts.lock().unwrap_or_else(PoisonError::into_inner).insert(host);
        Ok(gh)
    }

    fn is_host_verified(&self, host: &str) -> bool {
        self.verified_hosts.lock().unwrap_or_else(PoisonError::into_inner).contains(host)
    }

    fn check_installed(&self, runner: &dyn CommandRunner) -> Result<PathBuf> {
        let gh = self.locate()?;
        let version = runner
            .run(&Invocation::new(&gh).arg("--version"))
            .map_err(|_| Error::ToolingUnavailable(GH_INSTALL_GUIDE.to_string()))?;
        if !version.success() {
            return Err(Error::ToolingUnavailable(GH_INSTALL_GUIDE.to_string()));
        }
        Ok(self.path.get_or_init(|| gh).clone())
    }

    fn locate(&self) -> Result<PathBuf> {
        match &self.locator {
            GhLocator::Fixed(path) => Ok(path.clone()),
            GhLocator::SearchPath => {
                which::which("gh").map_err(|_| Error::ToolingUnavailable(GH_INSTALL_GUIDE.into()))
            }
        }
    }
}

fn normalize_host(host: &str) -> String {
    host.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::CommandOutput;
    use std::sync::Mutex;

    struct Scripted {
        calls: Mutex<Vec<String>>,
        auth_ok: bool,
    }

    impl CommandRunner for Scripted {
        fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
            let line = invocation.arg_strings().join(" ");
            self.calls.lock().unwrap().push(line.clone());
            if line.starts_with("auth status") && !self.auth_ok {
                return Ok(CommandOutput {
                    code: Some(1),
                    stdout: vec![],
                    stderr: b"You are not logged into any GitHub hosts.".to_vec(),
                });
            }
            Ok(CommandOutput { code: Some(0), ..Default::default() })
        }
    }

    fn gate() -> GhGate {
        GhGate::new(GhLocator::Fixed(PathBuf::from("/opt/gh")), "github.com")
    }

    #[test]
    fn verification_runs_once() {
        let runner = Scripted { calls: Mutex::new(vec![]), auth_ok: true };
        let gate = gate();
        assert_eq!(gate.require(&runner).unwrap(), PathBuf::from("/opt/gh"));
        assert_eq!(gate.require(&runner).unwrap(), PathBuf::from("/opt/gh"));
        assert!(gate.is_verified());
        let calls = runner.calls.lock().unwrap();
        assert_eq!(*calls, vec!["--version", "auth status --hostname github.com"]);
    }

    #[test]
    fn unauthenticated_includes_stderr_and_login_guide() {
        let runner = Scripted { calls: Mutex::new(vec![]), auth_ok: false };
        let gate = gate();
        let err = gate.require(&runner).unwrap_err();
        let Error::ToolingUnavailable(message) = err else { panic!("expected ToolingUnavailable") };
        assert!(message.starts_with("You are not logged into"));
        assert!(message.ends_with(&login_guide("github.com")));
        assert!(!gate.is_verified());
    }

    #[test]
    fn login_guide_names_the_checked_host() {
        let runner = Scripted { calls: Mutex::new(vec![]), auth_ok: false };
        let gate = gate();
        let Err(Error::ToolingUnavailable(message)) = gate.require_host(&runner, "GHE.example.com")
        else {
            panic!("expected ToolingUnavailable")
        };
        assert!(message.contains("gh auth login --hostname ghe.example.com"));
        assert!(!message.contains("--hostname github.com"));
    }

    #[test]
    fn each_host_is_verified_separately() {
        let runner = Scripted { calls: Mutex::new(vec![]), auth_ok: true };
        let gate = gate();
        gate.require(&runner).unwrap();
        gate.require_host(&runner, "ghe.example.com").unwrap();
        gate.require_host(&runner, "ghe.example.com").unwrap();
        let calls = runner.calls.lock().unwrap();
        assert_eq!(
            *calls,
            vec![
                "--version",
                "auth status --hostname github.com",
                "auth status --hostname ghe.example.com",
            ]
        );
    }

    #[test]
    fn auth_status_spawn_failure_is_tooling_unavailable() {
        struct AuthSpawnFails;
        impl CommandRunner for AuthSpawnFails {
            fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
                if invocation.arg_strings().first().map(String::as_str) == Some("auth") {
                    return Err(std::io::Error::from(std::io::ErrorKind::PermissionDenied).into());
                }
                Ok(CommandOutput { code: Some(0), ..Default::default() })
            }
        }
        let gate = gate();
        let err = gate.require(&AuthSpawnFails).unwrap_err();
        let Error::ToolingUnavailable(message) = err else { panic!("expected ToolingUnavailable") };
        assert!(message.starts_with("GitHub CLI authentication is required."));
    }

    #[test]
    fn failed_check_is_retried_on_next_call() {
        let runner = Scripted { calls: Mutex::new(vec![]), auth_ok: false };
        let gate = gate();
        assert!(gate.require(&runner).is_err());
        assert!(gate.require(&runner).is_err());
        let calls = runner.calls.lock().unwrap();
        assert_eq!(
            *calls,
            vec!["--version", "auth status --hostname github.com", "auth status --hostname github.com"]
        );
    }
}
