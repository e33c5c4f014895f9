//! Port interfaces
//!
//! The client talks to the network and to its credentials only through
//! these traits, so both can be swapped out in tests.

use badgekit_domain::Result;

use crate::request::PendingRequest;

/// Status and body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }
}

/// Sends one request and returns its response.
///
/// Implementations perform exactly one round trip: no retries. A failure to
/// obtain any response is reported as `BadgeKitError::Transport`.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &PendingRequest) -> Result<RawResponse>;
}

/// Attaches credentials to a finished request.
///
/// Called once per request, after the URL, headers and body are final.
pub trait RequestAuthorizer: Send + Sync {
    fn authorize(&self, request: &mut PendingRequest) -> Result<()>;
}
