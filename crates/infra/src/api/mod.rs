//! BadgeKit API client
//!
//! [`BadgeKitClient`] issues signed requests against a BadgeKit API server
//! and turns its responses into values or typed errors.
//!
//! # Architecture
//!
//! - Transport and authorizer are injected behind the `badgekit-core` ports
//! - One blocking round trip per operation, no retries
//! - Non-success responses are classified in [`errors`]

pub mod client;
pub mod errors;

pub use client::{BadgeKitClient, BadgeKitClientBuilder};
pub use errors::{classify, decode};
