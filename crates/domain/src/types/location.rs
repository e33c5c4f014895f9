//! Request descriptor
//!
//! A [`Location`] is a sparse address into the resource hierarchy: one
//! optional slug per [`Segment`] and one optional value per [`QueryFlag`].
//! The order in which fields are set has no effect on the path built from
//! it.

use std::borrow::Cow;

use serde::{Deserialize, Deserializer, Serialize};

use super::resource::{QueryFlag, Segment};

/// Value of a query flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Text(String),
}

impl FlagValue {
    /// Query-string form. Booleans become the literals `true` / `false`.
    pub fn as_query_value(&self) -> Cow<'_, str> {
        match self {
            Self::Bool(true) => Cow::Borrowed("true"),
            Self::Bool(false) => Cow::Borrowed("false"),
            Self::Text(text) => Cow::Borrowed(text.as_str()),
        }
    }
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FlagValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Sparse address of a resource or collection.
///
/// Empty slugs are normalized to "absent" on every entry point, so an
/// empty-string slug can never be targeted. A segment can also be marked
/// explicitly absent with [`Location::without`], which keeps client defaults
/// from filling it in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Location {
    #[serde(deserialize_with = "slug", skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(deserialize_with = "slug", skip_serializing_if = "Option::is_none")]
    issuer: Option<String>,
    #[serde(deserialize_with = "slug", skip_serializing_if = "Option::is_none")]
    program: Option<String>,
    #[serde(deserialize_with = "slug", skip_serializing_if = "Option::is_none")]
    badge: Option<String>,
    #[serde(deserialize_with = "slug", skip_serializing_if = "Option::is_none")]
    instance: Option<String>,
    #[serde(deserialize_with = "slug", skip_serializing_if = "Option::is_none")]
    application: Option<String>,
    #[serde(deserialize_with = "slug", skip_serializing_if = "Option::is_none")]
    evidence: Option<String>,
    #[serde(deserialize_with = "slug", skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
    #[serde(deserialize_with = "slug", skip_serializing_if = "Option::is_none")]
    code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    archived: Option<FlagValue>,
    /// Indexed by `Segment as usize`.
    #[serde(skip)]
    suppressed: [bool; Segment::ORDER.len()],
}

fn normalize(slug: String) -> Option<String> {
    if slug.is_empty() {
        None
    } else {
        Some(slug)
    }
}

fn slug<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.and_then(normalize))
}

impl Location {
    /// An empty location: the API root.
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, segment: Segment) -> &Option<String> {
        match segment {
            Segment::System => &self.system,
            Segment::Issuer => &self.issuer,
            Segment::Program => &self.program,
            Segment::Badge => &self.badge,
            Segment::Instance => &self.instance,
            Segment::Application => &self.application,
            Segment::Evidence => &self.evidence,
            Segment::Comment => &self.comment,
            Segment::Code => &self.code,
        }
    }

    fn slot_mut(&mut self, segment: Segment) -> &mut Option<String> {
        match segment {
            Segment::System => &mut self.system,
            Segment::Issuer => &mut self.issuer,
            Segment::Program => &mut self.program,
            Segment::Badge => &mut self.badge,
            Segment::Instance => &mut self.instance,
            Segment::Application => &mut self.application,
            Segment::Evidence => &mut self.evidence,
            Segment::Comment => &mut self.comment,
            Segment::Code => &mut self.code,
        }
    }

    /// Set a segment slug. An empty slug clears the segment.
    pub fn with(mut self, segment: Segment, slug: impl Into<String>) -> Self {
        self.set(segment, slug);
        self
    }

    /// In-place form of [`Location::with`].
    pub fn set(&mut self, segment: Segment, slug: impl Into<String>) {
        *self.slot_mut(segment) = normalize(slug.into());
        self.suppressed[segment as usize] = false;
    }

    /// Forget a segment. Client defaults may still supply it.
    pub fn clear(&mut self, segment: Segment) {
        *self.slot_mut(segment) = None;
        self.suppressed[segment as usize] = false;
    }

    /// Mark a segment explicitly absent, overriding any default for it.
    pub fn without(mut self, segment: Segment) -> Self {
        self.suppress(segment);
        self
    }

    /// In-place form of [`Location::without`].
    pub fn suppress(&mut self, segment: Segment) {
        *self.slot_mut(segment) = None;
        self.suppressed[segment as usize] = true;
    }

    /// Whether `segment` was marked explicitly absent.
    pub fn is_suppressed(&self, segment: Segment) -> bool {
        self.suppressed[segment as usize]
    }

    pub fn system(self, slug: impl Into<String>) -> Self {
        self.with(Segment::System, slug)
    }

    pub fn issuer(self, slug: impl Into<String>) -> Self {
        self.with(Segment::Issuer, slug)
    }

    pub fn program(self, slug: impl Into<String>) -> Self {
        self.with(Segment::Program, slug)
    }

    pub fn badge(self, slug: impl Into<String>) -> Self {
        self.with(Segment::Badge, slug)
    }

    pub fn instance(self, slug: impl Into<String>) -> Self {
        self.with(Segment::Instance, slug)
    }

    pub fn application(self, slug: impl Into<String>) -> Self {
        self.with(Segment::Application, slug)
    }

    pub fn evidence(self, slug: impl Into<String>) -> Self {
        self.with(Segment::Evidence, slug)
    }

    pub fn comment(self, slug: impl Into<String>) -> Self {
        self.with(Segment::Comment, slug)
    }

    pub fn code(self, slug: impl Into<String>) -> Self {
        self.with(Segment::Code, slug)
    }

    /// Set the `archived` query flag.
    pub fn archived(mut self, value: impl Into<FlagValue>) -> Self {
        self.archived = Some(value.into());
        self
    }

    /// Slug for `segment`, if present.
    pub fn segment(&self, segment: Segment) -> Option<&str> {
        self.slot(segment).as_deref()
    }

    /// Value of `flag`, if present.
    pub fn flag(&self, flag: QueryFlag) -> Option<&FlagValue> {
        match flag {
            QueryFlag::Archived => self.archived.as_ref(),
        }
    }

    /// Present segments in path order.
    pub fn segments(&self) -> impl Iterator<Item = (Segment, &str)> + '_ {
        Segment::ORDER
            .into_iter()
            .filter_map(move |segment| self.segment(segment).map(|slug| (segment, slug)))
    }

    /// Present flags in query order.
    pub fn flags(&self) -> impl Iterator<Item = (QueryFlag, &FlagValue)> + '_ {
        QueryFlag::ORDER.into_iter().filter_map(move |flag| self.flag(flag).map(|v| (flag, v)))
    }

    /// `true` when neither segments nor flags are set.
    pub fn is_empty(&self) -> bool {
        self.segments().next().is_none() && self.flags().next().is_none()
    }

    /// Fill every field absent in `self` from `base`.
    ///
    /// Fields present or suppressed in `self` always win.
    pub fn or(&self, base: &Self) -> Self {
        let mut merged = self.clone();
        for segment in Segment::ORDER {
            if merged.segment(segment).is_none() && !merged.is_suppressed(segment) {
                *merged.slot_mut(segment) = base.slot(segment).clone();
            }
        }
        if merged.archived.is_none() {
            merged.archived = base.archived.clone();
        }
        merged
    }
}

/// Location fields applied to every call a client makes.
///
/// Immutable once built; caller-supplied fields override defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientDefaults(Location);

impl ClientDefaults {
    pub fn new(location: Location) -> Self {
        Self(location)
    }

    /// Defaults that set nothing.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn location(&self) -> &Location {
        &self.0
    }

    /// Merge caller arguments over the defaults.
    pub fn apply(&self, caller: &Location) -> Location {
        caller.or(&self.0)
    }
}

impl From<Location> for ClientDefaults {
    fn from(location: Location) -> Self {
        Self(location)
    }
}
