//! Descriptor resolution
//!
//! [`resolve`] turns a [`RawDescriptor`] into a [`BuildTarget`] in a single
//! pass. Checks run in a fixed order and the first failure is returned:
//!
//! 1. application id and namespace
//! 2. SDK bounds
//! 3. signing policy references
//! 4. dependencies
//! 5. language levels
//! 6. desugaring runtime
//! 7. version info and NDK version
//! 8. plugin ids
//!
//! Framework references are looked up in the [`FrameworkDefaults`] passed by
//! the caller; nothing is read from the environment.

use crate::descriptor::{RawDependency, RawDescriptor, RawLanguage, RawSdk, RawValue};
use crate::error::{ConfigError, ConfigErrorKind, Result};
use crate::framework::{FrameworkDefaults, FrameworkValue};
use crate::target::{
    BuildTarget, DependencyRef, JavaVersion, LanguageCompatibility, SdkBounds, SigningPolicy,
    DEBUG_SIGNING_POLICY, DESUGARING_CONFIGURATION,
};
use apkcfg_core::validation;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

/// Resolve a descriptor against framework defaults
pub fn resolve(raw: &RawDescriptor, framework: &FrameworkDefaults) -> Result<BuildTarget> {
    let result = resolve_inner(raw, framework);
    match &result {
        Ok(target) => tracing::info!(
            application_id = %target.application_id,
            variants = target.build_variants.len(),
            dependencies = target.dependencies.len(),
            "Descriptor resolved"
        ),
        Err(err) => tracing::warn!(
            kind = %err.kind,
            field = %err.field,
            "Descriptor rejected: {}",
            err.reason
        ),
    }
    result
}

/// Load a descriptor file and resolve it
pub fn resolve_file(path: &Path, framework: &FrameworkDefaults) -> apkcfg_core::Result<BuildTarget> {
    let raw = RawDescriptor::from_path(path)?;
    tracing::debug!(path = %path.display(), "Descriptor loaded");
    resolve(&raw, framework).map_err(|e| {
        apkcfg_core::Error::from(e).with_context(format!("In descriptor {}", path.display()))
    })
}

fn resolve_inner(raw: &RawDescriptor, framework: &FrameworkDefaults) -> Result<BuildTarget> {
    let (application_id, namespace) = resolve_identity(raw)?;
    let sdk = resolve_sdk(&raw.sdk, framework)?;
    check_signing_policies(&raw.build_variants, &raw.signing_policies)?;
    let dependencies = resolve_dependencies(&raw.dependencies)?;
    let language = resolve_language(&raw.language)?;
    check_desugaring(raw.core_library_desugaring, &dependencies)?;
    let version_code = resolve_version_code(raw.version_code.as_ref(), framework)?;
    let version_name = resolve_version_name(raw.version_name.as_ref(), framework)?;
    let ndk_version = raw
        .ndk_version
        .as_ref()
        .map(|v| resolve_text("ndk_version", v, framework))
        .transpose()?;
    let plugins = resolve_plugins(&raw.plugins)?;

    Ok(BuildTarget {
        application_id,
        namespace,
        sdk,
        ndk_version,
        version_code,
        version_name,
        language,
        core_library_desugaring: raw.core_library_desugaring,
        plugins,
        signing_policies: raw.signing_policies.clone(),
        build_variants: raw.build_variants.clone(),
        dependencies,
        framework_source: raw.framework_source.clone(),
    })
}

fn resolve_identity(raw: &RawDescriptor) -> Result<(String, String)> {
    check_identifier("application_id", &raw.application_id)?;

    let namespace = match &raw.namespace {
        Some(ns) => {
            check_identifier("namespace", ns)?;
            ns.clone()
        }
        None => raw.application_id.clone(),
    };

    tracing::debug!(application_id = %raw.application_id, namespace = %namespace, "Identity validated");
    Ok((raw.application_id.clone(), namespace))
}

fn check_identifier(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ConfigError::new(
            ConfigErrorKind::InvalidIdentifier,
            field,
            value,
            "identifier is empty",
        ));
    }
    if !validation::is_reverse_domain(value) {
        return Err(ConfigError::new(
            ConfigErrorKind::InvalidIdentifier,
            field,
            value,
            "expected lowercase dot-separated segments, each starting with a letter",
        ));
    }
    Ok(())
}

fn resolve_sdk(raw: &RawSdk, framework: &FrameworkDefaults) -> Result<SdkBounds> {
    let min = resolve_sdk_level("sdk.min", raw.min.as_ref(), framework)?;
    let target = resolve_sdk_level("sdk.target", raw.target.as_ref(), framework)?;
    let compile = resolve_sdk_level("sdk.compile", raw.compile.as_ref(), framework)?;

    if min > target {
        return Err(ConfigError::new(
            ConfigErrorKind::InvalidSdkBounds,
            "sdk.min",
            min.to_string(),
            format!("min exceeds target {target}"),
        ));
    }
    if target > compile {
        return Err(ConfigError::new(
            ConfigErrorKind::InvalidSdkBounds,
            "sdk.target",
            target.to_string(),
            format!("target exceeds compile {compile}"),
        ));
    }

    tracing::debug!(min, target, compile, "SDK bounds validated");
    Ok(SdkBounds {
        min,
        target,
        compile,
    })
}

fn resolve_sdk_level(
    field: &str,
    raw: Option<&RawValue>,
    framework: &FrameworkDefaults,
) -> Result<u32> {
    let Some(raw) = raw else {
        return Err(ConfigError::new(
            ConfigErrorKind::InvalidSdkBounds,
            field,
            "",
            "SDK level is missing",
        ));
    };

    resolve_positive(field, raw, framework, ConfigErrorKind::InvalidSdkBounds)
}

/// Resolve a value that must be a positive integer; `kind` is reported when
/// the value resolves but is unusable
fn resolve_positive(
    field: &str,
    raw: &RawValue,
    framework: &FrameworkDefaults,
    kind: ConfigErrorKind,
) -> Result<u32> {
    let number = match raw {
        RawValue::Int(n) => *n,
        RawValue::Text(text) => match lookup(field, text, framework)? {
            Some(FrameworkValue::Int(n)) => i64::from(n),
            Some(FrameworkValue::Text(value)) => value.trim().parse::<i64>().map_err(|_| {
                ConfigError::new(kind, field, &value, "framework value is not an integer")
            })?,
            None => {
                return Err(ConfigError::new(
                    kind,
                    field,
                    text,
                    "expected a positive integer",
                ));
            }
        },
    };

    u32::try_from(number)
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| {
            ConfigError::new(
                kind,
                field,
                number.to_string(),
                "expected a positive integer",
            )
        })
}

/// Resolve a text value; non-reference strings are literals
fn resolve_text(field: &str, raw: &RawValue, framework: &FrameworkDefaults) -> Result<String> {
    match raw {
        RawValue::Int(n) => Ok(n.to_string()),
        RawValue::Text(text) => Ok(lookup(field, text, framework)?
            .map_or_else(|| text.clone(), FrameworkValue::into_text)),
    }
}

/// Look up `text` if it is a framework reference.
///
/// Returns `Ok(None)` for plain literals and an error for references
/// without a value.
fn lookup(field: &str, text: &str, framework: &FrameworkDefaults) -> Result<Option<FrameworkValue>> {
    let Some(key) = framework.reference(text) else {
        return Ok(None);
    };

    match framework.get(key) {
        Some(value) => {
            tracing::debug!(field, reference = text, ?value, "Framework value substituted");
            Ok(Some(value))
        }
        None => Err(ConfigError::new(
            ConfigErrorKind::UnresolvedFrameworkValue,
            field,
            text,
            format!("framework does not supply `{key}`"),
        )),
    }
}

fn check_signing_policies(
    variants: &BTreeMap<String, String>,
    policies: &BTreeMap<String, SigningPolicy>,
) -> Result<()> {
    for (variant, policy) in variants {
        if policy != DEBUG_SIGNING_POLICY && !policies.contains_key(policy) {
            return Err(ConfigError::new(
                ConfigErrorKind::UnresolvedSigningPolicy,
                format!("build_variants.{variant}"),
                policy,
                format!("signing policy `{policy}` is not defined"),
            ));
        }
    }

    tracing::debug!(variants = variants.len(), policies = policies.len(), "Signing policies resolved");
    Ok(())
}

fn resolve_dependencies(raw: &[RawDependency]) -> Result<Vec<DependencyRef>> {
    let mut seen: HashMap<String, usize> = HashMap::with_capacity(raw.len());
    let mut resolved = Vec::with_capacity(raw.len());

    for (index, dep) in raw.iter().enumerate() {
        let field = format!("dependencies[{index}]");

        let Some(coord) = validation::split_coordinate(&dep.coordinate) else {
            return Err(ConfigError::new(
                ConfigErrorKind::MalformedDependency,
                format!("{field}.coordinate"),
                &dep.coordinate,
                "expected group:artifact:version",
            ));
        };
        if !validation::is_gradle_configuration(&dep.configuration) {
            return Err(ConfigError::new(
                ConfigErrorKind::MalformedDependency,
                format!("{field}.configuration"),
                &dep.configuration,
                "expected a Gradle configuration name such as implementation",
            ));
        }

        let dependency = DependencyRef {
            configuration: dep.configuration.clone(),
            group: coord.group.to_string(),
            artifact: coord.artifact.to_string(),
            version: coord.version.to_string(),
        };

        if let Some(first) = seen.insert(dependency.key(), index) {
            return Err(ConfigError::new(
                ConfigErrorKind::DuplicateDependency,
                format!("{field}.coordinate"),
                &dep.coordinate,
                format!("{} is already declared by dependencies[{first}]", dependency.key()),
            ));
        }

        resolved.push(dependency);
    }

    tracing::debug!(count = resolved.len(), "Dependencies validated");
    Ok(resolved)
}

fn resolve_language(raw: &RawLanguage) -> Result<LanguageCompatibility> {
    let source = parse_java_version("language.source", raw.source.as_deref())?;
    let target = parse_java_version("language.target", raw.target.as_deref())?;
    let jvm_target = raw
        .jvm_target
        .as_deref()
        .map(|v| parse_java_version("language.jvm_target", Some(v)))
        .transpose()?;

    if source != target {
        return Err(ConfigError::new(
            ConfigErrorKind::LanguageMismatch,
            "language.target",
            raw.target.clone().unwrap_or_default(),
            format!("target differs from source {source}"),
        ));
    }
    if let Some(jvm) = &jvm_target {
        if *jvm != target {
            return Err(ConfigError::new(
                ConfigErrorKind::LanguageMismatch,
                "language.jvm_target",
                raw.jvm_target.clone().unwrap_or_default(),
                format!("jvm_target differs from target {target}"),
            ));
        }
    }

    tracing::debug!(level = %target, "Language compatibility validated");
    Ok(LanguageCompatibility {
        source,
        target,
        jvm_target,
    })
}

fn parse_java_version(field: &str, value: Option<&str>) -> Result<JavaVersion> {
    let Some(value) = value else {
        return Err(ConfigError::new(
            ConfigErrorKind::InvalidLanguageVersion,
            field,
            "",
            "language level is missing",
        ));
    };

    JavaVersion::parse(value).ok_or_else(|| {
        ConfigError::new(
            ConfigErrorKind::InvalidLanguageVersion,
            field,
            value,
            "expected a Java release such as 1.8, 11 or 17",
        )
    })
}

fn check_desugaring(enabled: bool, dependencies: &[DependencyRef]) -> Result<()> {
    if enabled
        && !dependencies
            .iter()
            .any(|d| d.configuration == DESUGARING_CONFIGURATION)
    {
        return Err(ConfigError::new(
            ConfigErrorKind::MissingDesugaringLibrary,
            "core_library_desugaring",
            "true",
            format!("no dependency uses the {DESUGARING_CONFIGURATION} configuration"),
        ));
    }
    Ok(())
}

fn resolve_version_code(raw: Option<&RawValue>, framework: &FrameworkDefaults) -> Result<Option<u32>> {
    raw.map(|v| resolve_positive("version_code", v, framework, ConfigErrorKind::InvalidVersionInfo))
        .transpose()
}

fn resolve_version_name(
    raw: Option<&RawValue>,
    framework: &FrameworkDefaults,
) -> Result<Option<String>> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    let name = resolve_text("version_name", raw, framework)?;
    if name.trim().is_empty() {
        return Err(ConfigError::new(
            ConfigErrorKind::InvalidVersionInfo,
            "version_name",
            name,
            "version name is empty",
        ));
    }
    Ok(Some(name))
}

fn resolve_plugins(raw: &[String]) -> Result<Vec<String>> {
    let mut seen = HashSet::with_capacity(raw.len());

    for (index, id) in raw.iter().enumerate() {
        let field = format!("plugins[{index}]");
        if !validation::is_plugin_id(id) {
            return Err(ConfigError::new(
                ConfigErrorKind::InvalidPlugin,
                field,
                id,
                "expected a Gradle plugin id",
            ));
        }
        if !seen.insert(id.as_str()) {
            return Err(ConfigError::new(
                ConfigErrorKind::InvalidPlugin,
                field,
                id,
                "plugin is declared twice",
            ));
        }
    }

    Ok(raw.to_vec())
}
