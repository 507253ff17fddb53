//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, Result, ResultExt};
use std::path::{Path, PathBuf};

/// Configuration wrapper
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed settings
    pub schema: ConfigSchema,
    /// File the settings were read from, if any
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file path, or search the standard locations.
    ///
    /// An explicit path that does not exist is an error; when searching, a
    /// missing file falls back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(p) = path {
            if !p.exists() {
                return Err(Error::config_not_found(p));
            }
            return Self::load_from(p);
        }

        match find_config_file() {
            Some(found) => Self::load_from(&found),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let schema = load_config_file(path)?;
        Ok(Self {
            schema,
            path: Some(path.to_path_buf()),
        })
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<PathBuf> {
    let candidates = [".apkcfg.toml", "apkcfg.toml", ".config/apkcfg.toml"];

    for candidate in candidates {
        let path = Path::new(candidate);
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }

    dirs::config_dir()
        .map(|dir| dir.join("apkcfg").join("config.toml"))
        .filter(|p| p.exists())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ConfigSchema> {
    let context = format!("Failed to read config file {}", path.display());
    let content = std::fs::read_to_string(path)
        .map_err(Error::from)
        .context(context)?;

    let context = format!("Failed to parse config file {}", path.display());
    toml::from_str(&content).map_err(Error::from).context(context)
}
