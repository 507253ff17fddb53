//! Android build-target resolution for apkcfg
//!
//! This crate provides the Android packaging layer:
//! - Raw descriptor parsing (TOML and JSON)
//! - Framework-supplied defaults (`flutter.minSdkVersion` and friends)
//! - Fail-fast resolution into a canonical [`BuildTarget`]
//! - Gradle Kotlin DSL rendering
//!
//! # Example
//!
//! ```rust,no_run
//! use apkcfg_android::{resolve, FrameworkDefaults, RawDescriptor};
//! use std::path::Path;
//!
//! let raw = RawDescriptor::from_path(Path::new("build-target.toml")).unwrap();
//! match resolve(&raw, &FrameworkDefaults::default()) {
//!     Ok(target) => println!("{}", apkcfg_android::gradle::render(&target)),
//!     Err(err) => eprintln!("{err}"),
//! }
//! ```

#![warn(missing_docs)]

pub mod descriptor;
pub mod error;
pub mod framework;
pub mod gradle;
pub mod resolver;
pub mod target;

pub use descriptor::{RawDependency, RawDescriptor, RawValue};
pub use error::{ConfigError, ConfigErrorKind};
pub use framework::FrameworkDefaults;
pub use resolver::{resolve, resolve_file};
pub use target::{BuildTarget, DependencyRef, JavaVersion, SdkBounds, SigningPolicy};
