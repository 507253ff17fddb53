//! Framework-supplied defaults
//!
//! The wrapped application framework decides some values itself (default SDK
//! levels, NDK version, version code and name). A descriptor refers to them
//! as `"<namespace>.<key>"`, e.g. `"flutter.minSdkVersion"`, and the resolver
//! looks them up in a [`FrameworkDefaults`] passed in by the caller.

use apkcfg_core::config::FrameworkConfig;
use apkcfg_core::error::{Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Values exported by the framework's own resolved configuration
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameworkDefaults {
    /// Reference prefix, e.g. `flutter`
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compile_sdk_version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_sdk_version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_sdk_version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ndk_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_code: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_name: Option<String>,
}

fn default_namespace() -> String {
    FrameworkConfig::default().namespace
}

impl Default for FrameworkDefaults {
    fn default() -> Self {
        Self::from(&FrameworkConfig::default())
    }
}

impl From<&FrameworkConfig> for FrameworkDefaults {
    fn from(config: &FrameworkConfig) -> Self {
        Self {
            namespace: config.namespace.clone(),
            compile_sdk_version: config.compile_sdk_version,
            min_sdk_version: config.min_sdk_version,
            target_sdk_version: config.target_sdk_version,
            ndk_version: config.ndk_version.clone(),
            version_code: config.version_code,
            version_name: config.version_name.clone(),
        }
    }
}

/// A resolved framework value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameworkValue {
    /// Numeric value (SDK levels, version code)
    Int(u32),
    /// Text value (NDK version, version name)
    Text(String),
}

impl FrameworkValue {
    /// Render as text regardless of the variant
    pub fn into_text(self) -> String {
        match self {
            Self::Int(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }
}

impl FrameworkDefaults {
    /// Load values exported by the framework as JSON (camelCase keys)
    pub fn load_json(path: &Path) -> Result<Self> {
        let context = format!("Failed to read framework values {}", path.display());
        let content = std::fs::read_to_string(path)
            .map_err(apkcfg_core::Error::from)
            .context(context)?;

        let context = format!("Failed to parse framework values {}", path.display());
        serde_json::from_str(&content)
            .map_err(apkcfg_core::Error::from)
            .context(context)
    }

    /// Layer `overlay` values on top of `self`; keys set in `overlay` win.
    /// The namespace of `self` is kept.
    #[must_use]
    pub fn merged(self, overlay: Self) -> Self {
        Self {
            namespace: self.namespace,
            compile_sdk_version: overlay.compile_sdk_version.or(self.compile_sdk_version),
            min_sdk_version: overlay.min_sdk_version.or(self.min_sdk_version),
            target_sdk_version: overlay.target_sdk_version.or(self.target_sdk_version),
            ndk_version: overlay.ndk_version.or(self.ndk_version),
            version_code: overlay.version_code.or(self.version_code),
            version_name: overlay.version_name.or(self.version_name),
        }
    }

    /// The key of a framework reference, or `None` when `text` is not one
    pub fn reference<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.strip_prefix(self.namespace.as_str())?
            .strip_prefix('.')
            .filter(|key| !key.is_empty())
    }

    /// Look up a key; unknown and unset keys both yield `None`
    pub fn get(&self, key: &str) -> Option<FrameworkValue> {
        match key {
            "compileSdkVersion" => self.compile_sdk_version.map(FrameworkValue::Int),
            "minSdkVersion" => self.min_sdk_version.map(FrameworkValue::Int),
            "targetSdkVersion" => self.target_sdk_version.map(FrameworkValue::Int),
            "versionCode" => self.version_code.map(FrameworkValue::Int),
            "ndkVersion" => self.ndk_version.clone().map(FrameworkValue::Text),
            "versionName" => self.version_name.clone().map(FrameworkValue::Text),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn flutter_defaults() -> FrameworkDefaults {
        FrameworkDefaults {
            compile_sdk_version: Some(34),
            min_sdk_version: Some(21),
            target_sdk_version: Some(34),
            ndk_version: Some("26.1.10909125".to_string()),
            version_code: Some(7),
            version_name: Some("1.2.0".to_string()),
            ..FrameworkDefaults::default()
        }
    }

    #[test]
    fn test_reference_parsing() {
        let fw = FrameworkDefaults::default();
        assert_eq!(fw.reference("flutter.minSdkVersion"), Some("minSdkVersion"));
        assert_eq!(fw.reference("flutter."), None);
        assert_eq!(fw.reference("flutterx.minSdkVersion"), None);
        assert_eq!(fw.reference("1.0.0"), None);
    }

    #[test]
    fn test_get_known_keys() {
        let fw = flutter_defaults();
        assert_eq!(fw.get("minSdkVersion"), Some(FrameworkValue::Int(21)));
        assert_eq!(
            fw.get("ndkVersion"),
            Some(FrameworkValue::Text("26.1.10909125".to_string()))
        );
        assert_eq!(fw.get("unknownKey"), None);
        assert_eq!(FrameworkDefaults::default().get("minSdkVersion"), None);
    }

    #[test]
    fn test_merged_overlay_wins() {
        let base = flutter_defaults();
        let overlay = FrameworkDefaults {
            min_sdk_version: Some(23),
            ..FrameworkDefaults::default()
        };

        let merged = base.merged(overlay);
        assert_eq!(merged.min_sdk_version, Some(23));
        assert_eq!(merged.compile_sdk_version, Some(34));
        assert_eq!(merged.version_name.as_deref(), Some("1.2.0"));
    }

    #[test]
    fn test_load_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"compileSdkVersion": 34, "minSdkVersion": 21, "versionName": "2.0.0"}}"#
        )
        .unwrap();

        let fw = FrameworkDefaults::load_json(file.path()).unwrap();
        assert_eq!(fw.namespace, "flutter");
        assert_eq!(fw.compile_sdk_version, Some(34));
        assert_eq!(fw.min_sdk_version, Some(21));
        assert_eq!(fw.version_name.as_deref(), Some("2.0.0"));
        assert_eq!(fw.target_sdk_version, None);
    }

    #[test]
    fn test_load_json_missing_file() {
        let err = FrameworkDefaults::load_json(Path::new("/nonexistent/values.json")).unwrap_err();
        assert_eq!(err.code, apkcfg_core::ErrorCode::FileNotFound);
    }
}
