//! Repository-scoped operations: clone and single-file fetch

use crate::client::GithubClient;
use crate::reference::{RepoReference, DEFAULT_HOST};
use std::path::Path;

mod clone;
pub mod context;
pub mod decode;
mod file;

pub use context::{ClonedRepo, TempWorkspace};

/// A normalized reference bound to a client.
#[derive(Debug, Clone)]
pub struct RepoHandle<'a> {
    client: &'a GithubClient,
    reference: RepoReference,
    branch: Option<String>,
}

impl<'a> RepoHandle<'a> {
    pub(crate) fn new(
        client: &'a GithubClient,
        reference: RepoReference,
        branch: Option<String>,
    ) -> Self {
        Self { client, reference, branch }
    }

    pub fn reference(&self) -> &RepoReference {
        &self.reference
    }

    /// Branch operations target; `None` means the remote default branch.
    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    /// Repository argument for `gh`: `owner/name`, or `host/owner/name` off github.com.
    fn gh_repo_arg(&self) -> String {
        if self.reference.host() == DEFAULT_HOST {
            self.reference.full_name()
        } else {
            format!("{}/{}", self.reference.host(), self.reference.full_name())
        }
    }

    /// Remove a directory kept from an earlier temp clone.
    pub fn cleanup_temp(&self, path: &Path) {
        self.client.workspace().cleanup(path);
    }
}
