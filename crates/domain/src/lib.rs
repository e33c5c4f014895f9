//! # BadgeKit Domain
//!
//! Value types shared by every layer of the BadgeKit client.
//!
//! This crate contains:
//! - Resource hierarchy types (`Segment`, `ResourceKind`, `QueryFlag`)
//! - The request descriptor (`Location`) and client defaults
//! - Client configuration structures
//! - The error taxonomy and `Result` alias
//!
//! ## Architecture
//! - No dependencies on other BadgeKit crates
//! - No I/O, no HTTP
//! - Pure data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
