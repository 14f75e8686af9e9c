//! Blocking HTTP GET with an optional bearer token

use crate::error::{Error, Result};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use std::time::Duration;

const USER_AGENT: &str = concat!("gh-fetch/", env!("CARGO_PKG_VERSION"));

/// A single GET request.
#[derive(Debug, Clone, Default)]
pub struct HttpRequest<'a> {
    pub url: &'a str,
    pub token: Option<&'a str>,
    pub accept: Option<&'a str>,
}

/// Thin wrapper over a shared blocking client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).user_agent(USER_AGENT).build()?;
        Ok(Self { client })
    }

    /// Return the body of a 2xx response. Any other status is
    /// `Error::OperationFailed`; transport failures are `Error::Http`.
    pub fn get(&self, request: &HttpRequest<'_>) -> Result<Vec<u8>> {
        tracing::debug!(url = request.url, authenticated = request.token.is_some(), "GET");

        let mut builder = self.client.get(request.url);
        if let Some(token) = request.token.filter(|t| !t.is_empty()) {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(accept) = request.accept {
            builder = builder.header(ACCEPT, accept);
        }

        let response = builder.send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::failed(format!("GET {}", request.url), format!("HTTP {status}")));
        }
        Ok(response.bytes()?.to_vec())
    }
}
