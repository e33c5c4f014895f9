//! Protocol constants
//!
//! Values fixed by the BadgeKit API server or by the client's defaults.

/// Value of the `app` field reported by a BadgeKit API root document.
pub const SERVER_APP_NAME: &str = "BadgeKit API";

/// Name of the client key sent in the `key` claim when none is configured.
pub const DEFAULT_KEY_NAME: &str = "master";

/// Lifetime of a signed request token, in seconds.
pub const DEFAULT_TOKEN_EXPIRY_SECS: u64 = 30;

/// Transport timeout applied when none is configured, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Prefix of the `Authorization` header value.
pub const AUTHORIZATION_SCHEME: &str = "JWT";

// Error codes understood by the response classifier
pub const CODE_RESOURCE_NOT_FOUND: &str = "ResourceNotFound";
pub const CODE_RESOURCE_CONFLICT: &str = "ResourceConflict";
pub const CODE_VALIDATION_ERROR: &str = "ValidationError";
