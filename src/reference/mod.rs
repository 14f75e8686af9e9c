//! GitHub repository reference normalization
//!
//! Accepts the reference shapes users paste around and reduces them to one
//! canonical `owner/name` pair:
//! - `git@github.com:owner/repo(.git)`
//! - `ssh://git@github.com/owner/repo(.git)`
//! - `https://github.com/owner/repo(.git)`
//! - `owner/repo`

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Host assumed for bare `owner/repo` slugs.
pub const DEFAULT_HOST: &str = "github.com";

const SEGMENT: &str = r"[A-Za-z0-9._-]+";

static SCP_SSH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^git@(?P<host>[A-Za-z0-9.-]+):(?P<owner>{SEGMENT})/(?P<name>{SEGMENT})/?$"))
        .expect("valid regex")
});

static URL_SSH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^ssh://git@(?P<host>[A-Za-z0-9.-]+)(?::\d+)?/(?P<owner>{SEGMENT})/(?P<name>{SEGMENT})/?$"
    ))
    .expect("valid regex")
});

static URL_HTTPS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^https?://(?:[^@/]+@)?(?P<host>[A-Za-z0-9.-]+)(?::\d+)?/(?P<owner>{SEGMENT})/(?P<name>{SEGMENT})/?$"
    ))
    .expect("valid regex")
});

static BARE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^(?P<owner>{SEGMENT})/(?P<name>{SEGMENT})/?$")).expect("valid regex")
});

/// Which textual form a reference was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Ssh,
    Https,
    Bare,
}

/// A normalized repository reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoReference {
    host: String,
    owner: String,
    name: String,
    protocol: Protocol,
}

impl RepoReference {
    /// Parse any accepted reference form.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidReference("reference must not be empty".to_string()));
        }

        let (caps, protocol) = if let Some(caps) = SCP_SSH.captures(trimmed) {
            (caps, Protocol::Ssh)
        } else if let Some(caps) = URL_SSH.captures(trimmed) {
            (caps, Protocol::Ssh)
        } else if let Some(caps) = URL_HTTPS.captures(trimmed) {
            (caps, Protocol::Https)
        } else if let Some(caps) = BARE.captures(trimmed) {
            (caps, Protocol::Bare)
        } else {
            return Err(Error::InvalidReference(trimmed.to_string()));
        };

        let host = caps.name("host").map_or(DEFAULT_HOST, |m| m.as_str()).to_ascii_lowercase();
        let owner = caps["owner"].to_string();
        let name = strip_git_suffix(&caps["name"]).to_string();

        if owner.chars().all(|c| c == '.') || name.is_empty() || name.chars().all(|c| c == '.') {
            return Err(Error::InvalidReference(trimmed.to_string()));
        }

        Ok(Self { host, owner, name, protocol })
    }

    /// Build a reference from already-split parts. Used when a full name comes
    /// back from `gh repo view`.
    pub fn from_parts(host: &str, owner: &str, name: &str, protocol: Protocol) -> Result<Self> {
        let slug = format!("{}/{}", owner.trim(), strip_git_suffix(name.trim()));
        let mut parsed = Self::parse(&slug)?;
        parsed.host = host.to_ascii_lowercase();
        parsed.protocol = protocol;
        Ok(parsed)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// `owner/name`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// `git@host:owner/name.git`
    pub fn ssh_url(&self) -> String {
        format!("git@{}:{}/{}.git", self.host, self.owner, self.name)
    }

    /// `https://host/owner/name.git`
    pub fn https_url(&self) -> String {
        format!("https://{}/{}/{}.git", self.host, self.owner, self.name)
    }

    /// URL handed to `git clone`: SSH for SSH references, HTTPS otherwise.
    pub fn clone_url(&self) -> String {
        match self.protocol {
            Protocol::Ssh => self.ssh_url(),
            Protocol::Https | Protocol::Bare => self.https_url(),
        }
    }
}

impl fmt::Display for RepoReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name())
    }
}

impl std::str::FromStr for RepoReference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn strip_git_suffix(name: &str) -> &str {
    name.strip_suffix(".git").unwrap_or(name)
}

/// Trim a repository name and replace spaces with dashes, the way
/// `gh repo create` names repositories.
pub fn sanitize_repo_name(name: &str) -> String {
    name.trim().replace(' ', "-")
}

/// Canonical HTTPS URL for `owner/name` on github.com.
pub fn build_repo_url(owner: &str, name: &str) -> Result<String> {
    let owner = owner.trim();
    let name = sanitize_repo_name(name);
    if owner.is_empty() || name.is_empty() {
        return Err(Error::InvalidReference(
            "owner and name must be non-empty to build repo URL".to_string(),
        ));
    }
    Ok(format!("https://{DEFAULT_HOST}/{owner}/{name}.git"))
}

/// Split an `owner/name` full name into its trimmed parts.
pub fn split_full_name(value: &str) -> Result<(String, String)> {
    let Some((owner, name)) = value.split_once('/') else {
        return Err(Error::InvalidReference(format!(
            "repository full name must be in 'owner/name' format: {value}"
        )));
    };
    let owner = owner.trim();
    let name = name.trim();
    if owner.is_empty() || name.is_empty() {
        return Err(Error::InvalidReference(format!(
            "repository owner and name must be non-empty: {value}"
        )));
    }
    Ok((owner.to_string(), name.to_string()))
}
