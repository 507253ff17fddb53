//! Configuration loading and schema definitions
//!
//! Tool-wide settings shared by the resolver and the CLI.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
