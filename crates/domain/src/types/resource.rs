//! Resource hierarchy vocabulary
//!
//! The BadgeKit API nests resources as
//! `systems/{slug}/issuers/{slug}/programs/{slug}/badges/{slug}/...`.
//! [`Segment`] names the levels that can appear in a path, in their fixed
//! order. [`ResourceKind`] names what can be listed or created, which is a
//! superset of the segments.

use std::fmt;
use std::str::FromStr;

use crate::errors::BadgeKitError;

/// One level of the resource hierarchy.
///
/// The derived `Ord` follows declaration order, which is the order segments
/// appear in a URL path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    System,
    Issuer,
    Program,
    Badge,
    Instance,
    Application,
    Evidence,
    Comment,
    Code,
}

impl Segment {
    /// Every segment, in path order.
    pub const ORDER: [Self; 9] = [
        Self::System,
        Self::Issuer,
        Self::Program,
        Self::Badge,
        Self::Instance,
        Self::Application,
        Self::Evidence,
        Self::Comment,
        Self::Code,
    ];

    /// Singular name, as used in configuration and error messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Issuer => "issuer",
            Self::Program => "program",
            Self::Badge => "badge",
            Self::Instance => "instance",
            Self::Application => "application",
            Self::Evidence => "evidence",
            Self::Comment => "comment",
            Self::Code => "code",
        }
    }

    /// Path component naming the collection of this segment.
    pub const fn plural(self) -> &'static str {
        match self {
            Self::System => "systems",
            Self::Issuer => "issuers",
            Self::Program => "programs",
            Self::Badge => "badges",
            Self::Instance => "instances",
            Self::Application => "applications",
            Self::Evidence => "evidence",
            Self::Comment => "comments",
            Self::Code => "codes",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Segment {
    type Err = BadgeKitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ORDER
            .into_iter()
            .find(|segment| segment.name() == s)
            .ok_or_else(|| BadgeKitError::InvalidRequest(format!("Unknown path segment: {s}")))
    }
}

/// Kind of object that can be listed or created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    System,
    Issuer,
    Program,
    Badge,
    Instance,
    Application,
    Evidence,
    Comment,
    Code,
    Claim,
    Review,
    /// `codes/random`: asks the server to generate a claim code.
    RandomCode,
}

impl ResourceKind {
    const ALL: [Self; 12] = [
        Self::System,
        Self::Issuer,
        Self::Program,
        Self::Badge,
        Self::Instance,
        Self::Application,
        Self::Evidence,
        Self::Comment,
        Self::Code,
        Self::Claim,
        Self::Review,
        Self::RandomCode,
    ];

    /// Singular name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Issuer => "issuer",
            Self::Program => "program",
            Self::Badge => "badge",
            Self::Instance => "instance",
            Self::Application => "application",
            Self::Evidence => "evidence",
            Self::Comment => "comment",
            Self::Code => "code",
            Self::Claim => "claim",
            Self::Review => "review",
            Self::RandomCode => "codes/random",
        }
    }

    /// Collection path for this kind.
    ///
    /// `evidence`, `claim` and `codes/random` are used verbatim; everything
    /// else takes a trailing `s`.
    pub const fn plural(self) -> &'static str {
        match self {
            Self::System => "systems",
            Self::Issuer => "issuers",
            Self::Program => "programs",
            Self::Badge => "badges",
            Self::Instance => "instances",
            Self::Application => "applications",
            Self::Evidence => "evidence",
            Self::Comment => "comments",
            Self::Code => "codes",
            Self::Claim => "claim",
            Self::Review => "reviews",
            Self::RandomCode => "codes/random",
        }
    }
}

impl From<Segment> for ResourceKind {
    fn from(segment: Segment) -> Self {
        match segment {
            Segment::System => Self::System,
            Segment::Issuer => Self::Issuer,
            Segment::Program => Self::Program,
            Segment::Badge => Self::Badge,
            Segment::Instance => Self::Instance,
            Segment::Application => Self::Application,
            Segment::Evidence => Self::Evidence,
            Segment::Comment => Self::Comment,
            Segment::Code => Self::Code,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResourceKind {
    type Err = BadgeKitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| BadgeKitError::InvalidRequest(format!("Unknown resource kind: {s}")))
    }
}

/// Query-string parameter understood by the API.
///
/// Flag names never collide with [`Segment`] names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QueryFlag {
    Archived,
}

impl QueryFlag {
    /// Every flag, in the order it is written to the query string.
    pub const ORDER: [Self; 1] = [Self::Archived];

    /// Parameter name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for QueryFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
