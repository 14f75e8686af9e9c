//! Single-file fetch
//!
//! Every remote failure (missing file, bad credentials, network, non-zero
//! exit) collapses to `Ok(None)` after being logged. Only unusable input and a
//! missing or unauthenticated `gh` surface as errors.

use super::decode::decode_bytes;
use super::RepoHandle;
use crate::config::FetchStrategy;
use crate::error::{Error, Result};
use crate::exec::HttpRequest;
use crate::reference::{Protocol, DEFAULT_HOST};
use base64::Engine as _;
use std::path::{Component, Path};

const RAW_ACCEPT: &str = "application/vnd.github.raw";

impl RepoHandle<'_> {
    /// Fetch a file and decode it as text.
    ///
    /// `encoding` is an encoding label such as `"utf-8"` or `"latin1"`; when
    /// omitted the encoding is detected.
    pub fn fetch_file(&self, relative_path: &str, encoding: Option<&str>) -> Result<Option<String>> {
        Ok(self.fetch_file_bytes(relative_path)?.map(|bytes| decode_bytes(&bytes, encoding).0))
    }

    /// Fetch a file's raw bytes.
    pub fn fetch_file_bytes(&self, relative_path: &str) -> Result<Option<Vec<u8>>> {
        let path = clean_relative_path(relative_path)?;
        let strategy = self.effective_strategy();

        let fetched = match strategy {
            FetchStrategy::Auto | FetchStrategy::Raw => self.fetch_raw(&path),
            FetchStrategy::ContentsApi => self.fetch_contents_api(&path),
            FetchStrategy::Sparse => self.fetch_sparse(&path),
            FetchStrategy::GhApi => self.fetch_gh_api(&path),
        };

        match fetched {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e @ Error::ToolingUnavailable(_)) => Err(e),
            Err(e) => {
                tracing::error!(
                    "Failed to fetch {} from {} ({:?}): {}",
                    path,
                    self.reference.full_name(),
                    strategy,
                    e
                );
                Ok(None)
            }
        }
    }

    /// `Auto` picks by protocol: SSH references use a sparse checkout,
    /// everything else the raw endpoint.
    fn effective_strategy(&self) -> FetchStrategy {
        match self.client.config().fetch_strategy {
            FetchStrategy::Auto => match self.reference.protocol() {
                Protocol::Ssh => FetchStrategy::Sparse,
                Protocol::Https | Protocol::Bare => FetchStrategy::Raw,
            },
            other => other,
        }
    }

    fn fetch_raw(&self, path: &str) -> Result<Vec<u8>> {
        let config = self.client.config();
        let url = format!(
            "{}/{}/{}/{}/{}",
            config.raw_base_url.trim_end_matches('/'),
            self.reference.owner(),
            self.reference.name(),
            encode_path(self.branch.as_deref().unwrap_or("HEAD")),
            encode_path(path)
        );
        self.client.http().get(&HttpRequest { url: &url, token: self.client.token(), accept: None })
    }

    fn fetch_contents_api(&self, path: &str) -> Result<Vec<u8>> {
        let config = self.client.config();
        let mut url = format!(
            "{}/repos/{}/{}/contents/{}",
            config.api_base_url.trim_end_matches('/'),
            self.reference.owner(),
            self.reference.name(),
            encode_path(path)
        );
        if let Some(branch) = &self.branch {
            url.push_str(&format!("?ref={}", urlencoding::encode(branch)));
        }
        self.client.http().get(&HttpRequest {
            url: &url,
            token: self.client.token(),
            accept: Some(RAW_ACCEPT),
        })
    }

    /// Shallow, blob-less clone with a sparse checkout of just `path`.
    fn fetch_sparse(&self, path: &str) -> Result<Vec<u8>> {
        let client = self.client;
        let scratch = client.workspace().scoped("git")?;
        let dir = scratch.path();

        let mut clone_args = vec![
            "clone".to_string(),
            "--filter=blob:none".to_string(),
            "--no-checkout".to_string(),
            "--depth=1".to_string(),
        ];
        if let Some(branch) = &self.branch {
            clone_args.extend(["--branch".to_string(), branch.clone()]);
        }
        clone_args.push(self.reference.clone_url());
        clone_args.push(dir.display().to_string());

        client.git_checked("sparse-checkout clone", &clone_args, None)?;
        client.git_checked("sparse-checkout init", ["sparse-checkout", "init", "--no-cone"], Some(dir))?;
        client.git_checked("sparse-checkout set", ["sparse-checkout", "set", path], Some(dir))?;
        client.git_checked("checkout", ["checkout"], Some(dir))?;

        Ok(std::fs::read(dir.join(path))?)
    }

    fn fetch_gh_api(&self, path: &str) -> Result<Vec<u8>> {
        let mut endpoint =
            format!("repos/{}/contents/{}", self.reference.full_name(), encode_path(path));
        if let Some(branch) = &self.branch {
            endpoint.push_str(&format!("?ref={}", urlencoding::encode(branch)));
        }

        let host = self.reference.host();
        let mut args = vec!["api".to_string()];
        if host != DEFAULT_HOST {
            args.extend(["--hostname".to_string(), host.to_string()]);
        }
        args.push(endpoint.clone());

        let output = self.client.gh_for(host, &args)?;
        if !output.success() {
            return Err(Error::failed(format!("gh api {endpoint}"), output.failure_detail()));
        }
        if output.stdout.is_empty() {
            tracing::warn!("File {} is empty.", path);
            return Ok(Vec::new());
        }
        decode_contents_payload(output.stdout, path)
    }
}

/// Unwrap a contents-API JSON payload. Non-JSON output and payloads without a
/// string `content` field are returned verbatim.
fn decode_contents_payload(raw: Vec<u8>, path: &str) -> Result<Vec<u8>> {
    let payload: serde_json::Value = match serde_json::from_slice(&raw) {
        Ok(value) => value,
        Err(_) => {
            tracing::debug!("Contents payload for {} is not JSON; returning it as-is", path);
            return Ok(raw);
        }
    };

    let Some(content) = payload.get("content").and_then(|c| c.as_str()) else {
        return Ok(raw);
    };

    if payload.get("encoding").and_then(|e| e.as_str()) == Some("base64") {
        let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
        return base64::engine::general_purpose::STANDARD
            .decode(compact)
            .map_err(|e| Error::failed(format!("decode base64 content for {path}"), e.to_string()));
    }
    Ok(content.trim().as_bytes().to_vec())
}

/// Percent-encode each `/`-separated segment so `?`, `#` and `%` stay part of the path.
fn encode_path(path: &str) -> String {
    path.split('/').map(urlencoding::encode).collect::<Vec<_>>().join("/")
}

/// Trim, drop leading slashes, and refuse paths that escape the repository.
fn clean_relative_path(relative_path: &str) -> Result<String> {
    let clean = relative_path.trim().trim_start_matches('/');
    if clean.is_empty() {
        return Err(Error::InvalidPath("relative_path must not be empty".to_string()));
    }
    let escapes = Path::new(clean)
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(Error::InvalidPath(format!("path escapes the repository: {clean}")));
    }
    Ok(clean.to_string())
}
