//! JWT request signer

use std::collections::BTreeMap;
use std::fmt;

use badgekit_domain::constants::AUTHORIZATION_SCHEME;
use badgekit_domain::{BadgeKitError, ClientConfig, Result, SigningAlgorithm};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{Map, Value};
use tracing::debug;

use super::claims::{self, Claim};
use crate::ports::RequestAuthorizer;
use crate::request::PendingRequest;

/// Header carrying the signed token.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Signs requests with an HMAC-keyed JWT built from registered claims.
///
/// Registration happens while the signer is being set up; afterwards it is
/// only read, so one signer can be shared across threads.
#[derive(Clone)]
pub struct RequestSigner {
    secret: Vec<u8>,
    algorithm: SigningAlgorithm,
    claims: BTreeMap<String, Claim>,
}

impl RequestSigner {
    /// Signer using HS256 with no claims registered.
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self::with_algorithm(secret, SigningAlgorithm::HS256)
    }

    pub fn with_algorithm(secret: impl AsRef<[u8]>, algorithm: SigningAlgorithm) -> Self {
        Self { secret: secret.as_ref().to_vec(), algorithm, claims: BTreeMap::new() }
    }

    /// The claim set a BadgeKit API server expects: `key`, `exp`, `method`,
    /// `path` and `body`.
    pub fn badgekit(secret: impl AsRef<[u8]>, key: &str, expiry_seconds: u64) -> Self {
        let mut signer = Self::new(secret);
        signer
            .register_claim("key", Claim::constant(key))
            .register_expiry(expiry_seconds)
            .register_claim("path", claims::path())
            .register_claim("method", claims::method())
            .register_claim("body", claims::body());
        signer
    }

    /// Standard BadgeKit signer from client configuration.
    pub fn from_config(config: &ClientConfig) -> Self {
        let mut signer = Self::badgekit(&config.secret, &config.key, config.expiry_seconds);
        signer.algorithm = config.algorithm;
        signer
    }

    /// Register (or replace) the claim called `name`.
    pub fn register_claim(&mut self, name: impl Into<String>, claim: Claim) -> &mut Self {
        self.claims.insert(name.into(), claim);
        self
    }

    /// Register an `exp` claim `seconds` after signing time.
    pub fn register_expiry(&mut self, seconds: u64) -> &mut Self {
        self.register_claim("exp", claims::expires_after(seconds))
    }

    pub const fn algorithm(&self) -> SigningAlgorithm {
        self.algorithm
    }

    /// Names of the registered claims, sorted.
    pub fn claim_names(&self) -> impl Iterator<Item = &str> {
        self.claims.keys().map(String::as_str)
    }

    /// Evaluate every registered claim against `request`, dropping the
    /// ones that come out empty.
    pub fn claims_for(&self, request: &PendingRequest) -> Map<String, Value> {
        self.claims
            .iter()
            .filter_map(|(name, claim)| claim.evaluate(request).map(|value| (name.clone(), value)))
            .collect()
    }

    /// Compact `header.claims.signature` token for `request`.
    ///
    /// # Errors
    /// Returns `BadgeKitError::Signing` if the token cannot be encoded.
    pub fn token_for(&self, request: &PendingRequest) -> Result<String> {
        let claims = self.claims_for(request);
        debug!(
            method = %request.method(),
            path = %request.path_url(),
            claims = ?claims.keys().collect::<Vec<_>>(),
            "signing request"
        );

        encode(
            &Header::new(jwt_algorithm(self.algorithm)),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .map_err(|e| BadgeKitError::Signing(format!("Failed to encode token: {e}")))
    }

    /// Set the `Authorization` header on `request` and return its value.
    ///
    /// Must run after the request is otherwise final: the `path` and `body`
    /// claims read its URL and body.
    ///
    /// # Errors
    /// Returns `BadgeKitError::Signing` if the token cannot be encoded.
    pub fn sign(&self, request: &mut PendingRequest) -> Result<String> {
        let header = format!("{AUTHORIZATION_SCHEME} token=\"{}\"", self.token_for(request)?);
        request.set_header(AUTHORIZATION_HEADER, header.clone());
        Ok(header)
    }
}

const fn jwt_algorithm(algorithm: SigningAlgorithm) -> Algorithm {
    match algorithm {
        SigningAlgorithm::HS256 => Algorithm::HS256,
        SigningAlgorithm::HS384 => Algorithm::HS384,
        SigningAlgorithm::HS512 => Algorithm::HS512,
    }
}

impl RequestAuthorizer for RequestSigner {
    fn authorize(&self, request: &mut PendingRequest) -> Result<()> {
        self.sign(request).map(|_| ())
    }
}

impl fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSigner")
            .field("secret", &"[REDACTED]")
            .field("algorithm", &self.algorithm)
            .field("claims", &self.claims)
            .finish()
    }
}
