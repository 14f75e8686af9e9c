//! gh-fetch: GitHub repository references, clones and single-file fetches
//!
//! Accepts SSH (`git@github.com:owner/repo.git`), HTTPS
//! (`https://github.com/owner/repo`) and bare (`owner/repo`) references,
//! normalizes them, and drives `gh`, `git` or plain HTTPS to clone a
//! repository, read one file from it, or create and push a new one.
//!
//! ```no_run
//! use gh_fetch::{ClientConfig, GithubClient};
//!
//! # fn main() -> gh_fetch::Result<()> {
//! let client = GithubClient::new(ClientConfig::default())?;
//! let repo = client.repo("octocat/Hello-World", None)?;
//! if let Some(readme) = repo.fetch_file("README", None)? {
//!     println!("{readme}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod exec;
pub mod fetch;
pub mod reference;
pub mod tooling;

pub use client::{CreateRepoOptions, GithubClient, Organization, PushOptions};
pub use config::{Backend, ClientConfig, FetchStrategy};
pub use error::{Error, Result};
pub use fetch::{ClonedRepo, RepoHandle};
pub use reference::{build_repo_url, Protocol, RepoReference};
