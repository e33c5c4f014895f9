//! Path construction
//!
//! Turns a sparse [`Location`] into a canonical relative path such as
//! `systems/{system}/issuers/{issuer}/badges?archived=true`. Segments always
//! come out in hierarchy order, whatever order the location was built in.

use std::fmt;

use badgekit_domain::{BadgeKitError, Location, Result};
use url::form_urlencoded;

/// Relative path plus optional query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltPath {
    /// Slash-joined path without a leading `/`. Empty for the API root.
    pub path: String,
    /// Form-encoded query string without the leading `?`.
    pub query: Option<String>,
}

impl BuiltPath {
    /// `path?query`, ready to be joined onto the base URL.
    pub fn to_relative_url(&self) -> String {
        match &self.query {
            Some(query) => format!("{}?{}", self.path, query),
            None => self.path.clone(),
        }
    }
}

impl fmt::Display for BuiltPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_relative_url())
    }
}

/// Build the path for `location`, followed by `extra_segments`.
///
/// Each present segment contributes its plural collection name and its
/// percent-encoded slug. `extra_segments` are appended verbatim, which is how
/// a collection such as `badges` or `codes/random` is targeted. Query flags
/// are form-encoded in their fixed order.
///
/// # Errors
/// Returns `BadgeKitError::InvalidRequest` for a `.` or `..` slug. URL
/// resolution treats those as dot-segments, even percent-encoded.
pub fn build_path(extra_segments: &[&str], location: &Location) -> Result<BuiltPath> {
    let mut parts: Vec<String> = Vec::new();

    for (segment, slug) in location.segments() {
        if slug == "." || slug == ".." {
            return Err(BadgeKitError::InvalidRequest(format!(
                "`{slug}` is not a valid {segment} slug"
            )));
        }
        parts.push(segment.plural().to_string());
        parts.push(urlencoding::encode(slug).into_owned());
    }

    parts.extend(
        extra_segments
            .iter()
            .map(|extra| extra.trim_matches('/'))
            .filter(|extra| !extra.is_empty())
            .map(str::to_string),
    );

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let mut has_query = false;
    for (flag, value) in location.flags() {
        serializer.append_pair(flag.name(), &value.as_query_value());
        has_query = true;
    }

    Ok(BuiltPath { path: parts.join("/"), query: has_query.then(|| serializer.finish()) })
}
