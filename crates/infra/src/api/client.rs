//! BadgeKit API client
//!
//! Each operation merges the client defaults under the caller's location,
//! builds the path, signs the request and performs one blocking round trip.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use badgekit_core::{
    build_path, satisfies_minimum, BuiltPath, PendingRequest, RawResponse, RequestAuthorizer,
    RequestSigner, Transport,
};
use badgekit_domain::constants::SERVER_APP_NAME;
use badgekit_domain::{
    BadgeKitError, ClientConfig, ClientDefaults, Location, RequestSummary, ResourceKind, Result,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::errors::{decode, expect_status};
use crate::http::HttpClient;

const STATUS_OK: u16 = 200;
const STATUS_CREATED: u16 = 201;

/// Client for a BadgeKit API server.
///
/// Immutable once built; share it freely between threads.
#[derive(Clone)]
pub struct BadgeKitClient {
    base_url: Url,
    transport: Arc<dyn Transport>,
    authorizer: Arc<dyn RequestAuthorizer>,
    defaults: ClientDefaults,
}

impl BadgeKitClient {
    /// Create a client with the standard HTTP transport and JWT signer.
    ///
    /// # Errors
    /// Returns `BadgeKitError::Config` if the configuration is invalid or the
    /// HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::builder().config(config).build()
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> BadgeKitClientBuilder {
        BadgeKitClientBuilder::default()
    }

    /// Root URL every path is joined onto. Always ends with `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn defaults(&self) -> &ClientDefaults {
        &self.defaults
    }

    /// Whether the server answers as a BadgeKit API.
    ///
    /// A server that cannot be reached is reported as `Ok(false)` rather than
    /// an error.
    ///
    /// # Errors
    /// Signing failures, and `InvalidResponse` when the server answers 200
    /// with a body that is not JSON.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub fn ping(&self) -> Result<bool> {
        let request = PendingRequest::get(self.base_url.clone());
        let (summary, response) = match self.dispatch(request) {
            Ok(exchange) => exchange,
            Err(err @ BadgeKitError::Transport { .. }) => {
                warn!(error = %err, "BadgeKit server unreachable");
                return Ok(false);
            }
            Err(err) => return Err(err),
        };

        if response.status != STATUS_OK {
            warn!(status = response.status, "ping returned non-success status");
            return Ok(false);
        }

        let body = decode(&summary, &response.body)?;
        let healthy = body.get("app").and_then(Value::as_str) == Some(SERVER_APP_NAME);
        info!(healthy, "ping complete");
        Ok(healthy)
    }

    /// List the `kind` collection under `location`.
    ///
    /// Returns the decoded envelope as sent by the server, e.g.
    /// `{"badges": [...]}`.
    ///
    /// # Errors
    /// Transport failures, undecodable bodies, and any status other than 200
    /// classified by its error code.
    #[instrument(skip(self, location), fields(kind = %kind))]
    pub fn list(&self, kind: ResourceKind, location: &Location) -> Result<Value> {
        let built = build_path(&[kind.plural()], &self.defaults.apply(location))?;
        self.get_path(&built)
    }

    /// Fetch the single resource `location` points at.
    ///
    /// # Errors
    /// As for [`list`](Self::list).
    #[instrument(skip(self, location))]
    pub fn get(&self, location: &Location) -> Result<Value> {
        let built = build_path(&[], &self.defaults.apply(location))?;
        self.get_path(&built)
    }

    /// Create a `kind` resource from `data` in the collection under
    /// `location`.
    ///
    /// # Errors
    /// `InvalidRequest` if `data` cannot be serialized; otherwise as for
    /// [`list`](Self::list), with 201 as the only accepted status.
    #[instrument(skip(self, data, location), fields(kind = %kind))]
    pub fn create<T>(&self, kind: ResourceKind, data: &T, location: &Location) -> Result<Value>
    where
        T: Serialize + ?Sized,
    {
        let built = build_path(&[kind.plural()], &self.defaults.apply(location))?;
        let body = serde_json::to_vec(data).map_err(|e| {
            BadgeKitError::InvalidRequest(format!("Failed to serialize {kind} body: {e}"))
        })?;

        let request = PendingRequest::post(self.url_for(&built)?)
            .with_header("Content-Type", "application/json")
            .with_body(body);
        let (summary, response) = self.dispatch(request)?;
        let created = expect_status(&summary, &response, STATUS_CREATED)
            .inspect_err(|err| warn!(error = %err, error_kind = err.label(), "create failed"))?;

        info!(path = %built, "resource created");
        Ok(created)
    }

    /// Not supported by this client.
    ///
    /// # Errors
    /// Always `BadgeKitError::NotImplemented`.
    pub fn update<T>(&self, _kind: ResourceKind, _data: &T, _location: &Location) -> Result<Value>
    where
        T: Serialize + ?Sized,
    {
        Err(BadgeKitError::NotImplemented("update"))
    }

    /// Not supported by this client.
    ///
    /// # Errors
    /// Always `BadgeKitError::NotImplemented`.
    pub fn delete(&self, _location: &Location) -> Result<Value> {
        Err(BadgeKitError::NotImplemented("delete"))
    }

    /// Version string reported by the server root.
    ///
    /// # Errors
    /// Transport and status failures as for [`get`](Self::get);
    /// `InvalidResponse` if the root document has no string `version`.
    #[instrument(skip(self))]
    pub fn server_version(&self) -> Result<String> {
        let request = PendingRequest::get(self.base_url.clone());
        let (summary, response) = self.dispatch(request)?;
        let body = expect_status(&summary, &response, STATUS_OK)?;

        body.get("version").and_then(Value::as_str).map(str::to_owned).ok_or_else(|| {
            BadgeKitError::InvalidResponse {
                method: summary.method.clone(),
                url: summary.url.clone(),
                reason: "missing `version` field".to_string(),
            }
        })
    }

    /// Fail unless the server is at least version `minimum`.
    ///
    /// `minimum` may omit trailing components: `"0.2"` means `"0.2.0"`.
    ///
    /// # Errors
    /// `VersionTooOld` if the server is older, `InvalidVersion` if either
    /// version does not parse, and anything [`server_version`] returns.
    ///
    /// [`server_version`]: Self::server_version
    #[instrument(skip(self))]
    pub fn require_server_version(&self, minimum: &str) -> Result<()> {
        let actual = self.server_version()?;
        if satisfies_minimum(&actual, minimum)? {
            debug!(%actual, %minimum, "server version accepted");
            return Ok(());
        }

        warn!(%actual, %minimum, "server version too old");
        Err(BadgeKitError::VersionTooOld {
            required: minimum.to_string(),
            actual,
            server_url: self.base_url.to_string(),
        })
    }

    fn get_path(&self, built: &BuiltPath) -> Result<Value> {
        let request = PendingRequest::get(self.url_for(built)?);
        let (summary, response) = self.dispatch(request)?;
        let body = expect_status(&summary, &response, STATUS_OK)
            .inspect_err(|err| warn!(error = %err, error_kind = err.label(), "request failed"))?;

        info!(path = %built, "GET request successful");
        Ok(body)
    }

    fn url_for(&self, built: &BuiltPath) -> Result<Url> {
        self.base_url.join(&built.to_relative_url()).map_err(|e| {
            BadgeKitError::InvalidRequest(format!("Cannot join `{built}` onto base URL: {e}"))
        })
    }

    /// Sign and send `request`, returning the response with the request's
    /// summary for error reporting.
    fn dispatch(&self, mut request: PendingRequest) -> Result<(RequestSummary, RawResponse)> {
        self.authorizer.authorize(&mut request)?;
        let summary = request.summary();
        debug!(method = %summary.method, url = %summary.url, "BadgeKit request");

        let response = self.transport.execute(&request)?;
        debug!(status = response.status, url = %summary.url, "BadgeKit response");
        Ok((summary, response))
    }
}

impl fmt::Debug for BadgeKitClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BadgeKitClient")
            .field("base_url", &self.base_url.as_str())
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

/// Treat the base URL as a directory so relative paths join beneath it.
fn normalize_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| BadgeKitError::Config(format!("Invalid base URL `{raw}`: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(BadgeKitError::Config(format!("Base URL `{raw}` cannot hold paths")));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// Builder for [`BadgeKitClient`]
///
/// Only the configuration is required; the transport and authorizer default
/// to [`HttpClient`] and [`RequestSigner::from_config`].
#[derive(Default)]
pub struct BadgeKitClientBuilder {
    config: Option<ClientConfig>,
    transport: Option<Arc<dyn Transport>>,
    authorizer: Option<Arc<dyn RequestAuthorizer>>,
}

impl BadgeKitClientBuilder {
    /// Set the client configuration
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Replace the HTTP transport
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Replace the request authorizer
    pub fn authorizer(mut self, authorizer: Arc<dyn RequestAuthorizer>) -> Self {
        self.authorizer = Some(authorizer);
        self
    }

    /// Build the client
    ///
    /// # Errors
    ///
    /// Returns `BadgeKitError::Config` if no configuration was given, it
    /// fails validation, or the default transport cannot be created.
    pub fn build(self) -> Result<BadgeKitClient> {
        let config =
            self.config.ok_or_else(|| BadgeKitError::Config("Client config not set".into()))?;
        config.validate()?;
        let base_url = normalize_base_url(&config.base_url)?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(
                HttpClient::builder()
                    .timeout(Duration::from_secs(config.timeout_seconds))
                    .build()?,
            ),
        };
        let authorizer = match self.authorizer {
            Some(authorizer) => authorizer,
            None => Arc::new(RequestSigner::from_config(&config)),
        };

        debug!(%base_url, key = %config.key, "BadgeKit client configured");

        Ok(BadgeKitClient { base_url, transport, authorizer, defaults: config.defaults })
    }
}
