//! Domain types and models
//!
//! Addressing types for the BadgeKit resource hierarchy.

pub mod location;
pub mod resource;

pub use location::{ClientDefaults, FlagValue, Location};
pub use resource::{QueryFlag, ResourceKind, Segment};
