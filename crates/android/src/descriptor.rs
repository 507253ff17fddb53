//! Raw build-target descriptors
//!
//! A [`RawDescriptor`] is the unvalidated form read from TOML or JSON. Every
//! field is optional or defaulted so that missing values are reported by the
//! resolver with a precise field path instead of a parse error.
//!
//! ```toml
//! application_id = "primeslot.com"
//! core_library_desugaring = true
//! plugins = ["com.android.application", "kotlin-android"]
//!
//! [sdk]
//! min = "flutter.minSdkVersion"
//! target = 34
//! compile = 34
//!
//! [language]
//! source = "11"
//! target = "11"
//!
//! [build_variants]
//! release = "debug"
//!
//! [[dependencies]]
//! coordinate = "com.android.tools:desugar_jdk_libs:2.0.4"
//! configuration = "coreLibraryDesugaring"
//! ```

use crate::target::{BuildTarget, SigningPolicy, DEFAULT_CONFIGURATION};
use apkcfg_core::error::{Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// A literal value or a framework reference such as `"flutter.minSdkVersion"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// Integer literal
    Int(i64),
    /// String literal or framework reference
    Text(String),
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<u32> for RawValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Unvalidated descriptor.
///
/// Scalar fields come first so TOML output keeps plain keys ahead of tables.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawDescriptor {
    #[serde(default)]
    pub application_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ndk_version: Option<RawValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_code: Option<RawValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_name: Option<RawValue>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub core_library_desugaring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework_source: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<String>,
    #[serde(default)]
    pub sdk: RawSdk,
    #[serde(default)]
    pub language: RawLanguage,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub build_variants: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub signing_policies: BTreeMap<String, SigningPolicy>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<RawDependency>,
}

/// Unvalidated SDK levels
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSdk {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<RawValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<RawValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compile: Option<RawValue>,
}

/// Unvalidated language levels
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawLanguage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jvm_target: Option<String>,
}

/// Unvalidated dependency declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawDependency {
    /// `group:artifact:version`
    pub coordinate: String,
    /// Gradle configuration; `implementation` when omitted
    #[serde(default = "default_configuration")]
    pub configuration: String,
}

fn default_configuration() -> String {
    DEFAULT_CONFIGURATION.to_string()
}

impl RawDependency {
    /// Declare an `implementation` dependency
    pub fn new(coordinate: impl Into<String>) -> Self {
        Self {
            coordinate: coordinate.into(),
            configuration: default_configuration(),
        }
    }

    /// Use another Gradle configuration
    #[must_use]
    pub fn with_configuration(mut self, configuration: impl Into<String>) -> Self {
        self.configuration = configuration.into();
        self
    }
}

impl RawDescriptor {
    /// Read a descriptor file; `.json` files are parsed as JSON, anything else as TOML
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(apkcfg_core::Error::file_not_found(path)
                .with_suggestion("Pass --descriptor or set general.descriptor in .apkcfg.toml"));
        }

        let content = std::fs::read_to_string(path)
            .map_err(apkcfg_core::Error::from)
            .context(format!("Failed to read descriptor {}", path.display()))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let parsed = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        };
        parsed.context(format!("Failed to parse descriptor {}", path.display()))
    }

    /// Parse a TOML descriptor
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Parse a JSON descriptor
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Serialize as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl From<&BuildTarget> for RawDescriptor {
    fn from(target: &BuildTarget) -> Self {
        Self {
            application_id: target.application_id.clone(),
            namespace: Some(target.namespace.clone()),
            ndk_version: target.ndk_version.as_deref().map(RawValue::from),
            version_code: target.version_code.map(RawValue::from),
            version_name: target.version_name.as_deref().map(RawValue::from),
            core_library_desugaring: target.core_library_desugaring,
            framework_source: target.framework_source.clone(),
            plugins: target.plugins.clone(),
            sdk: RawSdk {
                min: Some(target.sdk.min.into()),
                target: Some(target.sdk.target.into()),
                compile: Some(target.sdk.compile.into()),
            },
            language: RawLanguage {
                source: Some(target.language.source.to_string()),
                target: Some(target.language.target.to_string()),
                jvm_target: target.language.jvm_target.as_ref().map(ToString::to_string),
            },
            build_variants: target.build_variants.clone(),
            signing_policies: target.signing_policies.clone(),
            dependencies: target
                .dependencies
                .iter()
                .map(|d| RawDependency::new(d.coordinate()).with_configuration(&d.configuration))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apkcfg_core::ErrorCode;

    const PRIMESLOT: &str = r#"
application_id = "primeslot.com"
core_library_desugaring = true
framework_source = "../.."
plugins = ["com.android.application", "kotlin-android"]

[sdk]
min = "flutter.minSdkVersion"
target = 34
compile = 34

[language]
source = "11"
target = "11"

[build_variants]
release = "debug"

[[dependencies]]
coordinate = "com.android.tools:desugar_jdk_libs:2.0.4"
configuration = "coreLibraryDesugaring"
"#;

    #[test]
    fn test_parse_toml() {
        let raw = RawDescriptor::from_toml_str(PRIMESLOT).unwrap();
        assert_eq!(raw.application_id, "primeslot.com");
        assert!(raw.namespace.is_none());
        assert_eq!(raw.sdk.min, Some(RawValue::Text("flutter.minSdkVersion".to_string())));
        assert_eq!(raw.sdk.target, Some(RawValue::Int(34)));
        assert_eq!(raw.language.source.as_deref(), Some("11"));
        assert_eq!(raw.build_variants.get("release").map(String::as_str), Some("debug"));
        assert_eq!(raw.dependencies.len(), 1);
        assert_eq!(raw.dependencies[0].configuration, "coreLibraryDesugaring");
    }

    #[test]
    fn test_parse_json_default_configuration() {
        let raw = RawDescriptor::from_json_str(
            r#"{"application_id": "com.example.app",
                "dependencies": [{"coordinate": "com.example:desugar:2.0.4"}]}"#,
        )
        .unwrap();
        assert_eq!(raw.dependencies[0].configuration, "implementation");
        assert_eq!(raw.sdk, RawSdk::default());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = RawDescriptor::from_toml_str("application_id = \"a.b\"\nmin_sdk = 21\n").unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigParseError);
    }

    #[test]
    fn test_unknown_signing_policy_field_rejected() {
        let text = format!(
            "{PRIMESLOT}\n[signing_policies.upload]\nstore_file = \"k.jks\"\nstore_pasword = \"typo\"\n"
        );
        let err = RawDescriptor::from_toml_str(&text).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigParseError);
    }

    #[test]
    fn test_toml_output_parses_back() {
        let raw = RawDescriptor::from_toml_str(PRIMESLOT).unwrap();
        let text = raw.to_toml_string().unwrap();
        assert_eq!(RawDescriptor::from_toml_str(&text).unwrap(), raw);
    }

    #[test]
    fn test_from_path_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("build-target.toml");
        std::fs::write(&toml_path, PRIMESLOT).unwrap();
        let from_toml = RawDescriptor::from_path(&toml_path).unwrap();

        let json_path = dir.path().join("build-target.json");
        std::fs::write(&json_path, from_toml.to_json_string().unwrap()).unwrap();
        let from_json = RawDescriptor::from_path(&json_path).unwrap();

        assert_eq!(from_toml, from_json);
    }

    #[test]
    fn test_from_path_missing() {
        let err = RawDescriptor::from_path(Path::new("/nonexistent/build-target.toml")).unwrap_err();
        assert_eq!(err.code, ErrorCode::FileNotFound);
        assert!(err.suggestion.unwrap().contains("--descriptor"));
    }
}
