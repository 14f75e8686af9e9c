//! Authenticated-user lookups through `gh api`

use super::GithubClient;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// An organization the authenticated user belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub login: String,
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub description: Option<String>,
    /// Remaining API fields, kept verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl GithubClient {
    /// Login of the user `gh` is authenticated as.
    pub fn authenticated_user_login(&self) -> Result<String> {
        let output = self.gh(["api", "user", "--jq", ".login"])?;
        if !output.success() {
            return Err(Error::failed(
                "resolve authenticated user login",
                output.failure_detail(),
            ));
        }
        let login = output.stdout_str();
        if login.is_empty() {
            return Err(Error::failed(
                "resolve authenticated user login",
                "GitHub CLI did not return an authenticated user login",
            ));
        }
        Ok(login)
    }

    /// Organizations of the authenticated user. `gh` emits one JSON object per line.
    pub fn user_orgs(&self) -> Result<Vec<Organization>> {
        let output = self.gh(["api", "user/orgs", "--paginate", "--jq", ".[]"])?;
        if !output.success() {
            return Err(Error::failed("fetch user organizations", output.failure_detail()));
        }

        let payload = String::from_utf8_lossy(&output.stdout);
        payload
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| serde_json::from_str::<Organization>(line).map_err(Error::from))
            .collect()
    }
}
