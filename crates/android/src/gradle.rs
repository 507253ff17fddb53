//! Gradle build script rendering
//!
//! Renders a resolved [`BuildTarget`] as a `build.gradle.kts` module script
//! for the Gradle executor.

use crate::target::{BuildTarget, JavaVersion, SigningPolicy, DEBUG_SIGNING_POLICY};
use apkcfg_core::error::{Result, ResultExt};
use std::fmt;
use std::path::Path;

const INDENT: &str = "    ";

/// Build types Gradle defines on its own; everything else must be created
const BUILT_IN_BUILD_TYPES: [&str; 2] = ["debug", "release"];

const KOTLIN_PLUGINS: [&str; 2] = ["kotlin-android", "org.jetbrains.kotlin.android"];

/// A `build.gradle.kts` script for one build target
pub struct GradleScript<'a> {
    target: &'a BuildTarget,
}

impl<'a> GradleScript<'a> {
    /// Wrap a resolved target
    pub fn new(target: &'a BuildTarget) -> Self {
        Self { target }
    }

    fn has_kotlin(&self) -> bool {
        self.target
            .plugins
            .iter()
            .any(|p| KOTLIN_PLUGINS.contains(&p.as_str()))
    }

    fn write_plugins(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.target.plugins.is_empty() {
            return Ok(());
        }
        writeln!(f, "plugins {{")?;
        for plugin in &self.target.plugins {
            writeln!(f, "{INDENT}id({})", quote(plugin))?;
        }
        writeln!(f, "}}")?;
        writeln!(f)
    }

    fn write_android(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = self.target;
        writeln!(f, "android {{")?;
        writeln!(f, "{INDENT}namespace = {}", quote(&t.namespace))?;
        writeln!(f, "{INDENT}compileSdk = {}", t.sdk.compile)?;
        if let Some(ndk) = &t.ndk_version {
            writeln!(f, "{INDENT}ndkVersion = {}", quote(ndk))?;
        }

        writeln!(f)?;
        writeln!(f, "{INDENT}compileOptions {{")?;
        if t.core_library_desugaring {
            writeln!(f, "{INDENT}{INDENT}isCoreLibraryDesugaringEnabled = true")?;
        }
        writeln!(
            f,
            "{INDENT}{INDENT}sourceCompatibility = JavaVersion.{}",
            t.language.source.gradle_constant()
        )?;
        writeln!(
            f,
            "{INDENT}{INDENT}targetCompatibility = JavaVersion.{}",
            t.language.target.gradle_constant()
        )?;
        writeln!(f, "{INDENT}}}")?;

        if self.has_kotlin() || t.language.jvm_target.is_some() {
            let jvm: &JavaVersion = t.language.jvm_target.as_ref().unwrap_or(&t.language.target);
            writeln!(f)?;
            writeln!(f, "{INDENT}kotlinOptions {{")?;
            writeln!(f, "{INDENT}{INDENT}jvmTarget = {}", quote(&jvm.to_string()))?;
            writeln!(f, "{INDENT}}}")?;
        }

        writeln!(f)?;
        writeln!(f, "{INDENT}defaultConfig {{")?;
        writeln!(f, "{INDENT}{INDENT}applicationId = {}", quote(&t.application_id))?;
        writeln!(f, "{INDENT}{INDENT}minSdk = {}", t.sdk.min)?;
        writeln!(f, "{INDENT}{INDENT}targetSdk = {}", t.sdk.target)?;
        if let Some(code) = t.version_code {
            writeln!(f, "{INDENT}{INDENT}versionCode = {code}")?;
        }
        if let Some(name) = &t.version_name {
            writeln!(f, "{INDENT}{INDENT}versionName = {}", quote(name))?;
        }
        writeln!(f, "{INDENT}}}")?;

        self.write_signing_configs(f)?;
        self.write_build_types(f)?;

        writeln!(f, "}}")?;
        writeln!(f)
    }

    fn write_signing_configs(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.target.signing_policies.is_empty() {
            return Ok(());
        }

        writeln!(f)?;
        writeln!(f, "{INDENT}signingConfigs {{")?;
        for (name, policy) in &self.target.signing_policies {
            // `debug` already exists in every Android project
            let accessor = if name == DEBUG_SIGNING_POLICY {
                "getByName"
            } else {
                "create"
            };
            writeln!(f, "{INDENT}{INDENT}{accessor}({}) {{", quote(name))?;
            write_policy(f, policy)?;
            writeln!(f, "{INDENT}{INDENT}}}")?;
        }
        writeln!(f, "{INDENT}}}")
    }

    fn write_build_types(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.target.build_variants.is_empty() {
            return Ok(());
        }

        writeln!(f)?;
        writeln!(f, "{INDENT}buildTypes {{")?;
        for (variant, policy) in &self.target.build_variants {
            let accessor = if BUILT_IN_BUILD_TYPES.contains(&variant.as_str()) {
                "getByName"
            } else {
                "create"
            };
            writeln!(f, "{INDENT}{INDENT}{accessor}({}) {{", quote(variant))?;
            writeln!(
                f,
                "{INDENT}{INDENT}{INDENT}signingConfig = signingConfigs.getByName({})",
                quote(policy)
            )?;
            writeln!(f, "{INDENT}{INDENT}}}")?;
        }
        writeln!(f, "{INDENT}}}")
    }

    fn write_framework(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(source) = &self.target.framework_source else {
            return Ok(());
        };
        writeln!(f, "flutter {{")?;
        writeln!(f, "{INDENT}source = {}", quote(source))?;
        writeln!(f, "}}")?;
        writeln!(f)
    }

    fn write_dependencies(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "dependencies {{")?;
        for dep in &self.target.dependencies {
            writeln!(f, "{INDENT}{}({})", dep.configuration, quote(&dep.coordinate()))?;
        }
        writeln!(f, "}}")
    }
}

fn write_policy(f: &mut fmt::Formatter<'_>, policy: &SigningPolicy) -> fmt::Result {
    if let Some(store) = &policy.store_file {
        writeln!(f, "{INDENT}{INDENT}{INDENT}storeFile = file({})", quote(store))?;
    }
    if let Some(alias) = &policy.key_alias {
        writeln!(f, "{INDENT}{INDENT}{INDENT}keyAlias = {}", quote(alias))?;
    }
    Ok(())
}

impl fmt::Display for GradleScript<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_plugins(f)?;
        self.write_android(f)?;
        self.write_framework(f)?;
        self.write_dependencies(f)
    }
}

/// Kotlin string literal
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '$' => out.push_str("\\$"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Render a target as `build.gradle.kts` source
pub fn render(target: &BuildTarget) -> String {
    GradleScript::new(target).to_string()
}

/// Render a target and write it to `path`
pub fn write_script(target: &BuildTarget, path: &Path) -> Result<()> {
    std::fs::write(path, render(target))
        .map_err(apkcfg_core::Error::from)
        .context(format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "Gradle script written");
    Ok(())
}
