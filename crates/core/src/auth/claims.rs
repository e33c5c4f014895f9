//! Claim generators
//!
//! A [`Claim`] is either a constant or a function of the request being
//! signed. Claims are evaluated fresh for every request; a claim that yields
//! nothing, or a falsy value, is left out of the token.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use crate::request::PendingRequest;

/// Function computing a claim value from the outgoing request.
pub type ClaimGenerator = Arc<dyn Fn(&PendingRequest) -> Option<Value> + Send + Sync>;

/// Digest algorithm tag written next to the body hash.
pub const BODY_HASH_ALGORITHM: &str = "sha256";

/// A registered claim.
#[derive(Clone)]
pub enum Claim {
    Constant(Value),
    Computed(ClaimGenerator),
}

impl Claim {
    pub fn constant(value: impl Into<Value>) -> Self {
        Self::Constant(value.into())
    }

    pub fn computed<F>(generator: F) -> Self
    where
        F: Fn(&PendingRequest) -> Option<Value> + Send + Sync + 'static,
    {
        Self::Computed(Arc::new(generator))
    }

    /// Value of this claim for `request`, or `None` when it should be
    /// omitted.
    pub fn evaluate(&self, request: &PendingRequest) -> Option<Value> {
        let value = match self {
            Self::Constant(value) => Some(value.clone()),
            Self::Computed(generator) => generator(request),
        };
        value.filter(|value| !is_falsy(value))
    }
}

impl fmt::Debug for Claim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// `null`, `false`, zero, and empty strings, arrays and objects.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => {
            number.as_i64() == Some(0) || number.as_u64() == Some(0) || number.as_f64() == Some(0.0)
        }
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

/// HTTP verb of the request.
pub fn method() -> Claim {
    Claim::computed(|request| Some(Value::from(request.method().as_str())))
}

/// Path and query string of the request, so query parameters are signed.
pub fn path() -> Claim {
    Claim::computed(|request| Some(Value::from(request.path_url())))
}

/// SHA-256 of the exact body bytes, for verbs that carry a body.
///
/// Yields `{"alg": "sha256", "hash": "<hex>"}`; absent for GET and friends
/// and for empty bodies.
pub fn body() -> Claim {
    Claim::computed(|request| {
        if !request.method().sends_body() {
            return None;
        }
        let body = request.body().filter(|body| !body.is_empty())?;
        Some(json!({
            "alg": BODY_HASH_ALGORITHM,
            "hash": hex::encode(Sha256::digest(body)),
        }))
    })
}

/// Unix timestamp `seconds` after the moment of signing.
pub fn expires_after(seconds: u64) -> Claim {
    let offset = i64::try_from(seconds).unwrap_or(i64::MAX);
    Claim::computed(move |_| Some(Value::from(Utc::now().timestamp().saturating_add(offset))))
}
