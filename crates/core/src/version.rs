//! Server version parsing and comparison

use std::cmp::Ordering;

use badgekit_domain::{BadgeKitError, Result};
use semver::Version;

/// Parse a version string the way BadgeKit servers report them.
///
/// Accepts one to three dot-separated numeric components (missing ones are
/// zero) with an optional leading `v`, plus anything semver itself accepts.
///
/// # Errors
/// Returns `BadgeKitError::InvalidVersion` if the string is not a version.
pub fn parse_version(raw: &str) -> Result<Version> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);

    if let Ok(version) = Version::parse(trimmed) {
        return Ok(version);
    }

    let parts: Vec<&str> = trimmed.split('.').collect();
    let numeric = !parts.is_empty()
        && parts.len() <= 3
        && parts.iter().all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()));
    if !numeric {
        return Err(BadgeKitError::InvalidVersion(raw.to_string()));
    }

    let mut padded = parts.clone();
    padded.resize(3, "0");
    Version::parse(&padded.join(".")).map_err(|_| BadgeKitError::InvalidVersion(raw.to_string()))
}

/// Compare `actual` against `required`.
///
/// # Errors
/// Returns `BadgeKitError::InvalidVersion` if either string does not parse.
pub fn compare_versions(actual: &str, required: &str) -> Result<Ordering> {
    Ok(parse_version(actual)?.cmp(&parse_version(required)?))
}

/// Whether `actual` is at least `required`.
///
/// # Errors
/// Returns `BadgeKitError::InvalidVersion` if either string does not parse.
pub fn satisfies_minimum(actual: &str, required: &str) -> Result<bool> {
    compare_versions(actual, required).map(Ordering::is_ge)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_and_partial_versions() {
        assert_eq!(parse_version("0.2.9").unwrap(), Version::new(0, 2, 9));
        assert_eq!(parse_version("0.2").unwrap(), Version::new(0, 2, 0));
        assert_eq!(parse_version("1").unwrap(), Version::new(1, 0, 0));
        assert_eq!(parse_version("v1.4.0").unwrap(), Version::new(1, 4, 0));
        assert_eq!(parse_version(" 2.0.0 ").unwrap(), Version::new(2, 0, 0));
    }

    #[test]
    fn test_prerelease_orders_before_release() {
        assert!(!satisfies_minimum("0.3.0-beta.1", "0.3.0").unwrap());
    }

    #[test]
    fn test_minimum_checks() {
        assert!(!satisfies_minimum("0.2.9", "0.3.0").unwrap());
        assert!(satisfies_minimum("0.2.9", "0.2").unwrap());
        assert!(satisfies_minimum("0.2.9", "0.2.2").unwrap());
        assert!(satisfies_minimum("0.2.9", "0.2.9").unwrap());
        assert!(satisfies_minimum("0.10.0", "0.9.0").unwrap());
    }

    #[test]
    fn test_invalid_versions() {
        for raw in ["", "abc", "1.2.3.4", "1..2", "1.x"] {
            assert!(
                matches!(parse_version(raw), Err(BadgeKitError::InvalidVersion(_))),
                "{raw:?} should be rejected"
            );
        }
        assert!(compare_versions("0.2.9", "nope").is_err());
    }
}
