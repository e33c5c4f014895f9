//! # BadgeKit Infrastructure
//!
//! I/O-bound implementations of the `badgekit-core` ports.
//!
//! This crate contains:
//! - The blocking HTTP transport
//! - The BadgeKit API client
//! - Configuration loading from the environment and files
//!
//! ## Architecture
//! - Implements traits defined in `badgekit-core`
//! - Contains all "impure" code (network, filesystem, environment)

pub mod api;
pub mod config;
pub mod http;

// Re-export commonly used items
pub use api::{BadgeKitClient, BadgeKitClientBuilder};
pub use http::{HttpClient, HttpClientBuilder};
