//! Configuration management

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_KEY_NAME, DEFAULT_TIMEOUT_SECS, DEFAULT_TOKEN_EXPIRY_SECS};
use crate::errors::{BadgeKitError, Result};
use crate::types::ClientDefaults;

/// HMAC algorithm used to sign request tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SigningAlgorithm {
    #[default]
    HS256,
    HS384,
    HS512,
}

impl SigningAlgorithm {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HS256 => "HS256",
            Self::HS384 => "HS384",
            Self::HS512 => "HS512",
        }
    }
}

impl fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Root URL of the BadgeKit API server.
    pub base_url: String,
    /// Shared secret used to sign request tokens.
    #[serde(skip_serializing)]
    pub secret: String,
    /// Name of the secret, sent to the server as the `key` claim.
    #[serde(default = "default_key")]
    pub key: String,
    #[serde(default = "default_expiry")]
    pub expiry_seconds: u64,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    #[serde(default)]
    pub algorithm: SigningAlgorithm,
    #[serde(default)]
    pub defaults: ClientDefaults,
}

fn default_key() -> String {
    DEFAULT_KEY_NAME.to_string()
}

const fn default_expiry() -> u64 {
    DEFAULT_TOKEN_EXPIRY_SECS
}

const fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl ClientConfig {
    /// Configuration with every optional field at its default.
    pub fn new(base_url: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            secret: secret.into(),
            key: default_key(),
            expiry_seconds: default_expiry(),
            timeout_seconds: default_timeout(),
            algorithm: SigningAlgorithm::default(),
            defaults: ClientDefaults::default(),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_defaults(mut self, defaults: impl Into<ClientDefaults>) -> Self {
        self.defaults = defaults.into();
        self
    }

    /// Check the fields that cannot be defaulted.
    ///
    /// # Errors
    /// Returns `BadgeKitError::Config` if the base URL or secret is empty.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(BadgeKitError::Config("base_url must not be empty".into()));
        }
        if self.secret.is_empty() {
            return Err(BadgeKitError::Config("secret must not be empty".into()));
        }
        if self.key.is_empty() {
            return Err(BadgeKitError::Config("key must not be empty".into()));
        }
        Ok(())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("secret", &"[REDACTED]")
            .field("key", &self.key)
            .field("expiry_seconds", &self.expiry_seconds)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("algorithm", &self.algorithm)
            .field("defaults", &self.defaults)
            .finish()
    }
}
