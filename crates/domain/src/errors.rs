//! Error types used throughout the client

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Method and URL of the request that produced an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSummary {
    pub method: String,
    pub url: String,
}

impl RequestSummary {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self { method: method.into(), url: url.into() }
    }
}

impl fmt::Display for RequestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

/// Decoded error document returned by the API, plus the request it answered.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiFailure {
    pub info: Value,
    pub request: RequestSummary,
}

impl ApiFailure {
    pub fn new(info: Value, request: RequestSummary) -> Self {
        Self { info, request }
    }

    /// The server's `code` field.
    pub fn code(&self) -> Option<&str> {
        self.info.get("code").and_then(Value::as_str)
    }

    /// The server's `message` field.
    pub fn message(&self) -> Option<&str> {
        self.info.get("message").and_then(Value::as_str)
    }

    /// Field names listed in a `details` array.
    ///
    /// Entries without a string `field` are skipped; a `details` value that
    /// is not an array yields nothing.
    pub fn invalid_fields(&self) -> Vec<&str> {
        self.info
            .get("details")
            .and_then(Value::as_array)
            .map(|details| {
                details.iter().filter_map(|detail| detail.get("field")?.as_str()).collect()
            })
            .unwrap_or_default()
    }
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} returned {}: {}",
            self.request.method,
            self.request.url,
            self.code().unwrap_or("None"),
            self.message().unwrap_or("None"),
        )
    }
}

/// Main error type for the BadgeKit client
#[derive(Error, Debug)]
pub enum BadgeKitError {
    /// The request never produced an HTTP response.
    #[error("Transport error: {method} {url}: {message}")]
    Transport { method: String, url: String, message: String },

    /// The response body was not valid JSON, or lacked a required field.
    #[error("Invalid JSON in BadgeKit response to {method} {url}: {reason}")]
    InvalidResponse { method: String, url: String, reason: String },

    #[error("ResourceNotFound: {0}")]
    ResourceNotFound(ApiFailure),

    #[error("ResourceConflict: {0}")]
    ResourceConflict(ApiFailure),

    #[error("ValidationError: {0}: {fields}", fields = .0.invalid_fields().join(", "))]
    ValidationError(ApiFailure),

    /// Unexpected status with an unrecognized or malformed error document.
    #[error("Problem with {method} {url}: {body}")]
    Api { method: String, url: String, body: String },

    #[error("{0} is not implemented")]
    NotImplemented(&'static str),

    #[error(
        "Version {required} or greater of BadgeKit-API server required, but {server_url} is \
         only version {actual}."
    )]
    VersionTooOld { required: String, actual: String, server_url: String },

    #[error("Invalid version string: {0}")]
    InvalidVersion(String),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BadgeKitError {
    /// The API failure carried by a coded error, if any.
    pub fn api_failure(&self) -> Option<&ApiFailure> {
        match self {
            Self::ResourceNotFound(failure)
            | Self::ResourceConflict(failure)
            | Self::ValidationError(failure) => Some(failure),
            _ => None,
        }
    }

    /// Stable label suitable for structured logging.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::InvalidResponse { .. } => "invalid_response",
            Self::ResourceNotFound(_) => "resource_not_found",
            Self::ResourceConflict(_) => "resource_conflict",
            Self::ValidationError(_) => "validation_error",
            Self::Api { .. } => "api",
            Self::NotImplemented(_) => "not_implemented",
            Self::VersionTooOld { .. } => "version_too_old",
            Self::InvalidVersion(_) => "invalid_version",
            Self::Signing(_) => "signing",
            Self::InvalidRequest(_) => "invalid_request",
            Self::Config(_) => "config",
        }
    }
}

/// Result type alias for BadgeKit operations
pub type Result<T> = std::result::Result<T, BadgeKitError>;

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn post_systems() -> RequestSummary {
        RequestSummary::new("POST", "http://example.org/systems")
    }

    #[test]
    fn test_conflict_rendering() {
        let failure = ApiFailure::new(
            json!({
                "code": "ResourceConflict",
                "message": "system with that `slug` already exists",
                "details": {"slug": "system-slug", "name": "System Name"}
            }),
            post_systems(),
        );
        let rendered = BadgeKitError::ResourceConflict(failure).to_string();

        assert_eq!(
            rendered,
            "ResourceConflict: POST http://example.org/systems returned ResourceConflict: \
             system with that `slug` already exists"
        );
    }

    #[test]
    fn test_validation_rendering_lists_fields() {
        let failure = ApiFailure::new(
            json!({
                "code": "ValidationError",
                "message": "Could not validate required fields",
                "details": [
                    {"field": "slug", "value": ""},
                    {"field": "url", "value": "nope"}
                ]
            }),
            post_systems(),
        );
        assert_eq!(failure.invalid_fields(), vec!["slug", "url"]);

        let rendered = BadgeKitError::ValidationError(failure).to_string();
        assert!(rendered.starts_with("ValidationError: POST http://example.org/systems returned"));
        assert!(rendered.ends_with(": slug, url"));
    }

    #[test]
    fn test_invalid_fields_ignores_non_array_details() {
        let failure =
            ApiFailure::new(json!({"code": "ValidationError", "details": {}}), post_systems());
        assert!(failure.invalid_fields().is_empty());
    }

    #[test]
    fn test_api_failure_accessor() {
        let failure = ApiFailure::new(json!({"code": "ResourceNotFound"}), post_systems());
        let error = BadgeKitError::ResourceNotFound(failure.clone());
        assert_eq!(error.api_failure(), Some(&failure));
        assert_eq!(error.label(), "resource_not_found");
        assert!(BadgeKitError::NotImplemented("update").api_failure().is_none());
    }

    #[test]
    fn test_version_rendering() {
        let error = BadgeKitError::VersionTooOld {
            required: "0.3.0".into(),
            actual: "0.2.9".into(),
            server_url: "http://example.com/".into(),
        };
        assert_eq!(
            error.to_string(),
            "Version 0.3.0 or greater of BadgeKit-API server required, but \
             http://example.com/ is only version 0.2.9."
        );
    }
}
