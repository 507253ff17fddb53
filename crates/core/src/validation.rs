//! Syntax validation for descriptor values
//!
//! Provides the lexical checks used while resolving a build target:
//! - Application identifiers and namespaces (reverse-domain tokens)
//! - Maven dependency coordinates (`group:artifact:version`)
//! - Gradle configuration names and plugin ids
//! - Java language levels
//!
//! # Example
//!
//! ```rust
//! use apkcfg_core::validation::{is_reverse_domain, split_coordinate};
//!
//! assert!(is_reverse_domain("primeslot.com"));
//! let coord = split_coordinate("com.android.tools:desugar_jdk_libs:2.0.4").unwrap();
//! assert_eq!(coord.artifact, "desugar_jdk_libs");
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

static REVERSE_DOMAIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_]*(\.[a-z][a-z0-9_]*)+$").unwrap());

static COORDINATE_PART: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.\-]+$").unwrap());

static VERSION_PART: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.+\-]+$").unwrap());

static CONFIGURATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z][A-Za-z0-9]*$").unwrap());

static PLUGIN_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_\-]*(\.[A-Za-z][A-Za-z0-9_\-]*)*$").unwrap()
});

static JAVA_VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:1\.([1-9])|([1-9][0-9]?))$").unwrap());

/// A `group:artifact:version` coordinate split into its parts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coordinate<'a> {
    /// Maven group id
    pub group: &'a str,
    /// Artifact id
    pub artifact: &'a str,
    /// Version string
    pub version: &'a str,
}

/// Check that a value is a reverse-domain token: at least two lowercase
/// `.`-separated segments, each starting with a letter.
pub fn is_reverse_domain(value: &str) -> bool {
    REVERSE_DOMAIN.is_match(value)
}

/// Split a Maven coordinate into group, artifact and version.
///
/// Returns `None` unless there are exactly three non-empty parts made of
/// coordinate-safe characters.
pub fn split_coordinate(value: &str) -> Option<Coordinate<'_>> {
    let mut parts = value.split(':');
    let group = parts.next()?;
    let artifact = parts.next()?;
    let version = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    if COORDINATE_PART.is_match(group)
        && COORDINATE_PART.is_match(artifact)
        && VERSION_PART.is_match(version)
    {
        Some(Coordinate {
            group,
            artifact,
            version,
        })
    } else {
        None
    }
}

/// Check that a value is a Gradle configuration name (`implementation`,
/// `coreLibraryDesugaring`, ...)
pub fn is_gradle_configuration(value: &str) -> bool {
    CONFIGURATION.is_match(value)
}

/// Check that a value is a Gradle plugin id (`com.android.application`,
/// `kotlin-android`, ...)
pub fn is_plugin_id(value: &str) -> bool {
    PLUGIN_ID.is_match(value)
}

/// Major release number of a Java language level.
///
/// Accepts the legacy `1.x` spelling as well as plain majors, so `"1.8"` and
/// `"8"` both yield `8`.
pub fn java_major(value: &str) -> Option<u32> {
    let caps = JAVA_VERSION.captures(value)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reverse_domain_valid() {
        assert!(is_reverse_domain("primeslot.com"));
        assert!(is_reverse_domain("com.example.app_v2"));
    }

    #[test]
    fn test_reverse_domain_invalid() {
        assert!(!is_reverse_domain(""));
        assert!(!is_reverse_domain("app"));
        assert!(!is_reverse_domain("Com.example"));
        assert!(!is_reverse_domain("com.1example"));
        assert!(!is_reverse_domain("com..example"));
        assert!(!is_reverse_domain("com.example."));
        assert!(!is_reverse_domain("com-example.app"));
    }

    #[test]
    fn test_split_coordinate() {
        let coord = split_coordinate("com.android.tools:desugar_jdk_libs:2.0.4").unwrap();
        assert_eq!(coord.group, "com.android.tools");
        assert_eq!(coord.artifact, "desugar_jdk_libs");
        assert_eq!(coord.version, "2.0.4");

        assert!(split_coordinate("androidx.core:core-ktx:1.13.0-alpha01").is_some());
    }

    #[test]
    fn test_split_coordinate_malformed() {
        assert!(split_coordinate("com.example:desugar").is_none());
        assert!(split_coordinate("com.example:desugar:").is_none());
        assert!(split_coordinate("com.example::2.0").is_none());
        assert!(split_coordinate("a:b:c:d").is_none());
        assert!(split_coordinate("com example:desugar:1.0").is_none());
    }

    #[test]
    fn test_gradle_configuration() {
        assert!(is_gradle_configuration("implementation"));
        assert!(is_gradle_configuration("coreLibraryDesugaring"));
        assert!(!is_gradle_configuration("Implementation"));
        assert!(!is_gradle_configuration("core-library"));
    }

    #[test]
    fn test_plugin_id() {
        assert!(is_plugin_id("com.android.application"));
        assert!(is_plugin_id("kotlin-android"));
        assert!(is_plugin_id("dev.flutter.flutter-gradle-plugin"));
        assert!(!is_plugin_id(""));
        assert!(!is_plugin_id("com..android"));
    }

    #[test]
    fn test_java_major() {
        assert_eq!(java_major("1.8"), Some(8));
        assert_eq!(java_major("8"), Some(8));
        assert_eq!(java_major("11"), Some(11));
        assert_eq!(java_major("17"), Some(17));
        assert_eq!(java_major("1.10"), None);
        assert_eq!(java_major("VERSION_11"), None);
        assert_eq!(java_major(""), None);
    }

    proptest! {
        #[test]
        fn prop_lowercase_segments_are_reverse_domain(
            segments in prop::collection::vec("[a-z][a-z0-9_]{0,8}", 2..5)
        ) {
            prop_assert!(is_reverse_domain(&segments.join(".")));
        }

        #[test]
        fn prop_well_formed_coordinates_split(
            group in "[a-z][a-z.]{0,10}[a-z]",
            artifact in "[a-z][a-z_\\-]{0,10}",
            version in "[0-9]{1,2}\\.[0-9]{1,2}\\.[0-9]{1,2}",
        ) {
            let raw = format!("{group}:{artifact}:{version}");
            let coord = split_coordinate(&raw).unwrap();
            prop_assert_eq!(coord.group, group.as_str());
            prop_assert_eq!(coord.artifact, artifact.as_str());
            prop_assert_eq!(coord.version, version.as_str());
        }
    }
}
