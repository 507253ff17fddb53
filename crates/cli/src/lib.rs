//! CLI utilities for apkcfg
//!
//! Provides shared CLI functionality:
//! - Status messages
//! - Error rendering
//! - Duration and count formatting

#![warn(missing_docs)]

pub mod output;
