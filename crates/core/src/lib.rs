//! Core utilities for apkcfg
//!
//! This crate provides functionality shared by the resolver and the CLI:
//!
//! - **Error handling**: Coded errors with context, recovery suggestions and exit codes
//! - **Configuration**: TOML-based tool configuration (`.apkcfg.toml`)
//! - **Validation**: Syntax checks for identifiers, coordinates and language levels
//!
//! # Example
//!
//! ```rust,no_run
//! use apkcfg_core::config::Config;
//!
//! let config = Config::load(None).expect("Failed to load configuration");
//! println!("Descriptor: {}", config.schema.general.descriptor);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod validation;

pub use error::{Error, ErrorCode, Result, ResultExt};
