//! Canonical build-target model
//!
//! A [`BuildTarget`] is only ever produced by [`crate::resolver::resolve`],
//! so every value of this type satisfies the descriptor invariants.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Name of the signing policy every Android project defines implicitly
pub const DEBUG_SIGNING_POLICY: &str = "debug";

/// Gradle configuration used when a dependency does not name one
pub const DEFAULT_CONFIGURATION: &str = "implementation";

/// Gradle configuration that supplies the core library desugaring runtime
pub const DESUGARING_CONFIGURATION: &str = "coreLibraryDesugaring";

/// Validated, immutable build-target configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
    /// Application id (`defaultConfig.applicationId`)
    pub application_id: String,
    /// Android namespace; equals `application_id` unless set explicitly
    pub namespace: String,
    /// SDK levels
    pub sdk: SdkBounds,
    /// NDK version passed through to the executor
    pub ndk_version: Option<String>,
    /// Integer version code
    pub version_code: Option<u32>,
    /// User-visible version name
    pub version_name: Option<String>,
    /// Java/Kotlin compatibility levels
    pub language: LanguageCompatibility,
    /// Whether core library desugaring is enabled
    pub core_library_desugaring: bool,
    /// Gradle plugin ids, in declaration order
    pub plugins: Vec<String>,
    /// User-defined signing policies
    pub signing_policies: BTreeMap<String, SigningPolicy>,
    /// Build variant name to signing policy name
    pub build_variants: BTreeMap<String, String>,
    /// Library dependencies, in declaration order
    pub dependencies: Vec<DependencyRef>,
    /// Source path handed to the framework plugin
    pub framework_source: Option<String>,
}

impl BuildTarget {
    /// Signing policy name and body used by a variant.
    ///
    /// The body is `None` for the built-in debug policy unless it was
    /// redefined. Unknown variants yield `None`.
    pub fn signing_policy_for(&self, variant: &str) -> Option<(&str, Option<&SigningPolicy>)> {
        let name = self.build_variants.get(variant)?;
        Some((name.as_str(), self.signing_policies.get(name)))
    }

    /// Dependencies declared under a Gradle configuration
    pub fn dependencies_in<'a>(
        &'a self,
        configuration: &'a str,
    ) -> impl Iterator<Item = &'a DependencyRef> + 'a {
        self.dependencies
            .iter()
            .filter(move |d| d.configuration == configuration)
    }
}

/// SDK API levels; `min <= target <= compile` always holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SdkBounds {
    /// Lowest supported API level
    pub min: u32,
    /// API level the app is tested against
    pub target: u32,
    /// API level the app is compiled against
    pub compile: u32,
}

/// Java language level, normalized to its major release.
///
/// `"1.8"` and `"8"` parse to the same value; [`fmt::Display`] writes the
/// spelling Gradle and Kotlin expect (`1.8`, `11`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JavaVersion(u32);

impl JavaVersion {
    /// Parse a language level in either spelling
    pub fn parse(value: &str) -> Option<Self> {
        apkcfg_core::validation::java_major(value).map(Self)
    }

    /// Name of the matching `org.gradle.api.JavaVersion` constant
    pub fn gradle_constant(&self) -> String {
        match self.0 {
            major @ 1..=8 => format!("VERSION_1_{major}"),
            major => format!("VERSION_{major}"),
        }
    }
}

impl fmt::Display for JavaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            major @ 1..=8 => write!(f, "1.{major}"),
            major => write!(f, "{major}"),
        }
    }
}

/// Java/Kotlin compatibility levels; all present levels are equal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageCompatibility {
    /// `compileOptions.sourceCompatibility`
    pub source: JavaVersion,
    /// `compileOptions.targetCompatibility`
    pub target: JavaVersion,
    /// `kotlinOptions.jvmTarget`, when set explicitly
    pub jvm_target: Option<JavaVersion>,
}

/// Named signing configuration.
///
/// The contents are never interpreted; they are handed to the executor as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SigningPolicy {
    /// Keystore path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_file: Option<String>,
    /// Key alias inside the keystore
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_alias: Option<String>,
}

/// A library dependency under a Gradle configuration
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DependencyRef {
    /// Gradle configuration, e.g. `implementation`
    pub configuration: String,
    /// Maven group id
    pub group: String,
    /// Artifact id
    pub artifact: String,
    /// Version
    pub version: String,
}

impl DependencyRef {
    /// `group:artifact:version`
    pub fn coordinate(&self) -> String {
        format!("{}:{}:{}", self.group, self.artifact, self.version)
    }

    /// `group:artifact`, the identity used for duplicate detection
    pub fn key(&self) -> String {
        format!("{}:{}", self.group, self.artifact)
    }
}
