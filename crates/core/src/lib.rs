//! # BadgeKit Core
//!
//! Pure request-construction logic - no HTTP.
//!
//! This crate contains:
//! - Path building from a [`Location`](badgekit_domain::Location)
//! - The pending request model handed to signers and transports
//! - JWT request signing and the standard claim generators
//! - Server version comparison
//! - Port interfaces (traits) for the transport and the authorizer
//!
//! ## Architecture Principles
//! - Only depends on `badgekit-domain`
//! - All I/O happens behind the traits in [`ports`]

pub mod auth;
pub mod path;
pub mod ports;
pub mod request;
pub mod version;

pub use auth::{Claim, RequestSigner};
pub use path::{build_path, BuiltPath};
pub use ports::{RawResponse, RequestAuthorizer, Transport};
pub use request::{HttpMethod, PendingRequest};
pub use version::{parse_version, satisfies_minimum};
