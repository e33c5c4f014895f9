//! Response decoding and error classification
//!
//! Every BadgeKit response body is JSON. A body that fails to decode is an
//! [`BadgeKitError::InvalidResponse`] whatever the status; a decoded body
//! with an unexpected status is classified by its `code` field.

use badgekit_core::RawResponse;
use badgekit_domain::constants::{
    CODE_RESOURCE_CONFLICT, CODE_RESOURCE_NOT_FOUND, CODE_VALIDATION_ERROR,
};
use badgekit_domain::{ApiFailure, BadgeKitError, RequestSummary, Result};
use serde_json::Value;

/// Decode a response body as JSON.
///
/// # Errors
/// Returns `BadgeKitError::InvalidResponse` if the body is not valid JSON.
pub fn decode(request: &RequestSummary, body: &str) -> Result<Value> {
    serde_json::from_str(body).map_err(|err| BadgeKitError::InvalidResponse {
        method: request.method.clone(),
        url: request.url.clone(),
        reason: err.to_string(),
    })
}

/// Decode `response` and accept it only with the `expected` status.
///
/// # Errors
/// `InvalidResponse` when the body is not JSON, otherwise whatever
/// [`classify`] makes of an unexpected status.
pub fn expect_status(
    request: &RequestSummary,
    response: &RawResponse,
    expected: u16,
) -> Result<Value> {
    let body = decode(request, &response.body)?;
    if response.status == expected {
        Ok(body)
    } else {
        Err(classify(request, body))
    }
}

/// Turn a decoded error document into the matching error.
///
/// The typed variants need a recognized `code` and a `message` key, whatever
/// its value; anything else becomes [`BadgeKitError::Api`] carrying the
/// whole body.
pub fn classify(request: &RequestSummary, body: Value) -> BadgeKitError {
    let code = body.get("code").and_then(Value::as_str).map(str::to_owned);
    let has_message = body.get("message").is_some();

    match code.as_deref() {
        Some(CODE_RESOURCE_NOT_FOUND) if has_message => {
            BadgeKitError::ResourceNotFound(ApiFailure::new(body, request.clone()))
        }
        Some(CODE_RESOURCE_CONFLICT) if has_message => {
            BadgeKitError::ResourceConflict(ApiFailure::new(body, request.clone()))
        }
        Some(CODE_VALIDATION_ERROR) if has_message => {
            BadgeKitError::ValidationError(ApiFailure::new(body, request.clone()))
        }
        _ => BadgeKitError::Api {
            method: request.method.clone(),
            url: request.url.clone(),
            body: body.to_string(),
        },
    }
}
