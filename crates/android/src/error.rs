//! Descriptor resolution errors
//!
//! Every failed resolution reports exactly one [`ConfigError`]: the first
//! violated rule, the field it concerns and the offending value.

use apkcfg_core::error::{Error, ErrorCode};
use std::fmt;
use thiserror::Error;

/// Result type for descriptor resolution
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Which validation rule a descriptor violated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigErrorKind {
    /// `application_id` or `namespace` is not a reverse-domain token
    InvalidIdentifier,
    /// An SDK level is missing, non-positive, or out of order
    InvalidSdkBounds,
    /// A build variant names a signing policy that does not exist
    UnresolvedSigningPolicy,
    /// Two dependencies share `group:artifact`
    DuplicateDependency,
    /// A dependency coordinate or configuration is not well-formed
    MalformedDependency,
    /// Source, target and JVM target levels disagree
    LanguageMismatch,
    /// A language level is missing or not a Java release
    InvalidLanguageVersion,
    /// Desugaring is enabled without a desugaring runtime dependency
    MissingDesugaringLibrary,
    /// `version_code` or `version_name` is unusable
    InvalidVersionInfo,
    /// A framework reference has no value
    UnresolvedFrameworkValue,
    /// A plugin id is malformed or declared twice
    InvalidPlugin,
}

impl ConfigErrorKind {
    /// Stable name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidIdentifier => "InvalidIdentifier",
            Self::InvalidSdkBounds => "InvalidSdkBounds",
            Self::UnresolvedSigningPolicy => "UnresolvedSigningPolicy",
            Self::DuplicateDependency => "DuplicateDependency",
            Self::MalformedDependency => "MalformedDependency",
            Self::LanguageMismatch => "LanguageMismatch",
            Self::InvalidLanguageVersion => "InvalidLanguageVersion",
            Self::MissingDesugaringLibrary => "MissingDesugaringLibrary",
            Self::InvalidVersionInfo => "InvalidVersionInfo",
            Self::UnresolvedFrameworkValue => "UnresolvedFrameworkValue",
            Self::InvalidPlugin => "InvalidPlugin",
        }
    }

    /// Tool-wide error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidIdentifier => ErrorCode::InvalidIdentifier,
            Self::InvalidSdkBounds => ErrorCode::InvalidSdkBounds,
            Self::UnresolvedSigningPolicy => ErrorCode::UnresolvedSigningPolicy,
            Self::DuplicateDependency => ErrorCode::DuplicateDependency,
            Self::MalformedDependency => ErrorCode::MalformedDependency,
            Self::LanguageMismatch => ErrorCode::LanguageMismatch,
            Self::InvalidLanguageVersion => ErrorCode::InvalidLanguageVersion,
            Self::MissingDesugaringLibrary => ErrorCode::MissingDesugaringLibrary,
            Self::InvalidVersionInfo => ErrorCode::InvalidVersionInfo,
            Self::UnresolvedFrameworkValue => ErrorCode::UnresolvedFrameworkValue,
            Self::InvalidPlugin => ErrorCode::InvalidPlugin,
        }
    }

    fn suggestion(&self) -> &'static str {
        match self {
            Self::InvalidIdentifier => {
                "Use lowercase dot-separated segments that start with a letter, e.g. com.example.app"
            }
            Self::InvalidSdkBounds => "Keep min <= target <= compile, all positive integers",
            Self::UnresolvedSigningPolicy => {
                "Define the policy under [signing_policies] or use the built-in \"debug\" policy"
            }
            Self::DuplicateDependency => "Declare each group:artifact only once",
            Self::MalformedDependency => "Write coordinates as group:artifact:version",
            Self::LanguageMismatch => "Set source, target and jvm_target to the same Java release",
            Self::InvalidLanguageVersion => "Use a Java release such as \"1.8\", \"11\" or \"17\"",
            Self::MissingDesugaringLibrary => {
                "Add a coreLibraryDesugaring dependency, e.g. com.android.tools:desugar_jdk_libs"
            }
            Self::InvalidVersionInfo => "Use a positive version_code and a non-empty version_name",
            Self::UnresolvedFrameworkValue => {
                "Provide the value under [framework] or pass --framework-values"
            }
            Self::InvalidPlugin => "List each plugin id once, e.g. com.android.application",
        }
    }
}

impl fmt::Display for ConfigErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A descriptor validation failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {field} = {value:?}: {reason}")]
pub struct ConfigError {
    /// Violated rule
    pub kind: ConfigErrorKind,
    /// Dotted path of the offending field, e.g. `sdk.min`
    pub field: String,
    /// Offending value as written
    pub value: String,
    /// Why the value was rejected
    pub reason: String,
}

impl ConfigError {
    /// Create a new error
    pub fn new(
        kind: ConfigErrorKind,
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::descriptor(err.kind.code(), format!("{}: {}", err.field, err.reason))
            .with_context(format!("{} = {:?}", err.field, err.value))
            .with_suggestion(err.kind.suggestion())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apkcfg_core::error::exit_codes;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::new(
            ConfigErrorKind::InvalidSdkBounds,
            "sdk.min",
            "35",
            "min exceeds target 34",
        );
        assert_eq!(
            err.to_string(),
            "InvalidSdkBounds: sdk.min = \"35\": min exceeds target 34"
        );
    }

    #[test]
    fn test_config_error_into_core_error() {
        let err: Error = ConfigError::new(
            ConfigErrorKind::LanguageMismatch,
            "language.target",
            "17",
            "target differs from source 11",
        )
        .into();

        assert_eq!(err.code, ErrorCode::LanguageMismatch);
        assert_eq!(err.exit_code(), exit_codes::VALIDATION_ERROR);
        assert_eq!(err.context.as_deref(), Some("language.target = \"17\""));
        assert!(err.suggestion.is_some());
    }

    #[test]
    fn test_every_kind_is_a_descriptor_code() {
        let kinds = [
            ConfigErrorKind::InvalidIdentifier,
            ConfigErrorKind::InvalidSdkBounds,
            ConfigErrorKind::UnresolvedSigningPolicy,
            ConfigErrorKind::DuplicateDependency,
            ConfigErrorKind::MalformedDependency,
            ConfigErrorKind::LanguageMismatch,
            ConfigErrorKind::InvalidLanguageVersion,
            ConfigErrorKind::MissingDesugaringLibrary,
            ConfigErrorKind::InvalidVersionInfo,
            ConfigErrorKind::UnresolvedFrameworkValue,
            ConfigErrorKind::InvalidPlugin,
        ];
        for (offset, kind) in (1u32..).zip(kinds) {
            let code = kind.code();
            assert_eq!(code.code(), 4000 + offset);
            assert_eq!(code.category(), "Descriptor");
            assert_eq!(code.exit_code(), exit_codes::VALIDATION_ERROR);
        }
    }
}
