use std::time::Duration;

use badgekit_core::{PendingRequest, RawResponse, Transport};
use badgekit_domain::constants::DEFAULT_TIMEOUT_SECS;
use badgekit_domain::{BadgeKitError, Result};
use reqwest::blocking::Client as ReqwestClient;
use reqwest::header::HeaderMap;
use reqwest::Method;
use tracing::debug;

/// Blocking HTTP client that performs exactly one round trip per request.
///
/// The underlying reqwest client owns its own runtime, so it must not be
/// created or dropped from inside an async context.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Send the request and read the whole response body as text.
    ///
    /// # Errors
    /// Returns `BadgeKitError::Transport` if no response could be read.
    pub fn send(&self, request: &PendingRequest) -> Result<RawResponse> {
        let method = Method::from_bytes(request.method().as_str().as_bytes())
            .map_err(|err| transport_error(request, err))?;
        let mut builder = self.client.request(method, request.url().clone());
        for (name, value) in request.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body() {
            builder = builder.body(body.to_vec());
        }

        debug!(method = %request.method(), url = %request.url(), "sending HTTP request");

        let response = builder.send().map_err(|err| {
            debug!(method = %request.method(), url = %request.url(), error = %err, "HTTP request failed");
            transport_error(request, err)
        })?;

        let status = response.status().as_u16();
        let body = response.text().map_err(|err| transport_error(request, err))?;
        debug!(method = %request.method(), url = %request.url(), status, "received HTTP response");

        Ok(RawResponse { status, body })
    }
}

impl Transport for HttpClient {
    fn execute(&self, request: &PendingRequest) -> Result<RawResponse> {
        self.send(request)
    }
}

fn transport_error(request: &PendingRequest, err: impl std::fmt::Display) -> BadgeKitError {
    BadgeKitError::Transport {
        method: request.method().to_string(),
        url: request.url().to_string(),
        message: err.to_string(),
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: Option<String>,
    default_headers: Option<HeaderMap>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: Some(concat!("badgekit-client/", env!("CARGO_PKG_VERSION")).to_string()),
            default_headers: None,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    /// # Errors
    /// Returns `BadgeKitError::Config` if the TLS backend or other client
    /// settings cannot be initialized.
    pub fn build(self) -> Result<HttpClient> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder
            .build()
            .map_err(|err| BadgeKitError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(HttpClient { client })
    }
}
