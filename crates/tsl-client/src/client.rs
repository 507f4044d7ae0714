//! Trust-list HTTP client.

use reqwest::Client as HttpClient;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use crate::error::{ClientError, Result};
use crate::tsl::TrustList;

/// Trust list published by the French ANTS for 2D-Doc signers
pub const DEFAULT_TRUST_LIST_URL: &str =
    "https://ants.gouv.fr/files/25362bbf-a54e-4ed9-b98a-71e2382b54e0/tsl_signed.xml";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Browser User-Agent; the publishing host turns away unknown agents
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:123.0) Gecko/20100101 Firefox/123.0";

/// A downloaded provider certificate container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    /// Last path segment of the download URL
    pub filename: String,
    /// Raw container bytes
    pub bytes: Vec<u8>,
}

/// Client for trust lists and the containers they reference
#[derive(Clone)]
pub struct TslClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
}

impl TslClient {
    /// Create a client with default settings
    pub fn new() -> Result<Self> {
        TslClientBuilder::new().build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder() -> TslClientBuilder {
        TslClientBuilder::new()
    }

    /// Download and parse a trust list.
    pub async fn trust_list(&self, url: &str) -> Result<TrustList> {
        let body = self.fetch(url).await?;
        let text = String::from_utf8_lossy(&body);
        let list = TrustList::parse(&text)?;
        info!(url, providers = list.len(), "fetched trust list");
        Ok(list)
    }

    /// Download a provider's certificate container.
    pub async fn container(&self, url: &str) -> Result<Container> {
        let filename = filename_from_url(url)?;
        let bytes = self.fetch(url).await?;
        debug!(url, %filename, size = bytes.len(), "downloaded container");
        Ok(Container { filename, bytes })
    }

    /// Perform a GET request and return the body
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        debug!(url, "GET request");

        let response = self
            .inner
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ClientError::Http {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                url: url.to_string(),
                code: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| ClientError::Http {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        Ok(body.to_vec())
    }
}

/// Last non-empty path segment of a URL.
pub fn filename_from_url(url: &str) -> Result<String> {
    let parsed = Url::parse(url).map_err(|e| ClientError::InvalidUrl(format!("{url}: {e}")))?;
    parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ClientError::InvalidUrl(format!("{url}: no file name in path")))
}

/// Builder for configuring a [`TslClient`]
pub struct TslClientBuilder {
    timeout: Duration,
    user_agent: String,
    accept_invalid_certs: bool,
}

impl Default for TslClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TslClientBuilder {
    /// Create a new builder with default settings
    #[must_use]
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_invalid_certs: false,
        }
    }

    /// Set the request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Skip TLS certificate verification (some publishers serve incomplete chains)
    #[must_use]
    pub const fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<TslClient> {
        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .gzip(true)
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        Ok(TslClient {
            inner: Arc::new(ClientInner { http }),
        })
    }
}
