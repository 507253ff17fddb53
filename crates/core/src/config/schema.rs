//! Configuration schema definitions
//!
//! Tool-wide settings read from `.apkcfg.toml`.

use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConfigSchema {
    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,

    /// Values supplied by the wrapped application framework
    #[serde(default)]
    pub framework: FrameworkConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// General project configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// Descriptor file to resolve when none is given on the command line
    #[serde(default = "default_descriptor")]
    pub descriptor: String,

    /// Output format for `resolve`: `toml` or `json`
    #[serde(default = "default_output_format")]
    pub output_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            descriptor: default_descriptor(),
            output_format: default_output_format(),
        }
    }
}

fn default_descriptor() -> String {
    "build-target.toml".to_string()
}

fn default_output_format() -> String {
    "toml".to_string()
}

/// Framework-supplied defaults.
///
/// These are opaque to apkcfg: a descriptor may reference them as
/// `"<namespace>.<key>"`, e.g. `"flutter.minSdkVersion"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameworkConfig {
    /// Prefix used by descriptor references
    #[serde(default = "default_framework_namespace")]
    pub namespace: String,

    /// `<namespace>.compileSdkVersion`
    #[serde(default)]
    pub compile_sdk_version: Option<u32>,

    /// `<namespace>.minSdkVersion`
    #[serde(default)]
    pub min_sdk_version: Option<u32>,

    /// `<namespace>.targetSdkVersion`
    #[serde(default)]
    pub target_sdk_version: Option<u32>,

    /// `<namespace>.ndkVersion`
    #[serde(default)]
    pub ndk_version: Option<String>,

    /// `<namespace>.versionCode`
    #[serde(default)]
    pub version_code: Option<u32>,

    /// `<namespace>.versionName`
    #[serde(default)]
    pub version_name: Option<String>,
}

impl Default for FrameworkConfig {
    fn default() -> Self {
        Self {
            namespace: default_framework_namespace(),
            compile_sdk_version: None,
            min_sdk_version: None,
            target_sdk_version: None,
            ndk_version: None,
            version_code: None,
            version_name: None,
        }
    }
}

fn default_framework_namespace() -> String {
    "flutter".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Default filter level when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
