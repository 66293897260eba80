//! Configuration file resolution and loading
//!
//! Config file resolution follows this priority order:
//! 1. Explicit path (command-line argument)
//! 2. Environment variable
//! 3. `<user config dir>/<app_name>/config.toml`
//!
//! A missing optional config file is not an error: callers fall back to
//! compiled defaults. An explicitly requested file that does not exist is.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Locates the TOML configuration file for an application
pub struct ConfigFileResolver {
    app_name: String,
    env_var_name: String,
}

impl ConfigFileResolver {
    /// Create resolver for the given application name and environment variable
    pub fn new(app_name: &str, env_var_name: &str) -> Self {
        Self {
            app_name: app_name.to_string(),
            env_var_name: env_var_name.to_string(),
        }
    }

    /// Resolve the config file path
    ///
    /// Returns `Ok(None)` when no explicit path or environment override is
    /// given and the user config file does not exist.
    pub fn resolve(&self, cli_arg: Option<&Path>) -> Result<Option<PathBuf>> {
        // Priority 1: Command-line argument
        if let Some(path) = cli_arg {
            return Self::require_existing(path.to_path_buf(), "command line");
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(&self.env_var_name) {
            if !path.trim().is_empty() {
                return Self::require_existing(PathBuf::from(path), &self.env_var_name);
            }
        }

        // Priority 3: User config directory
        if let Some(path) = self.user_config_path() {
            if path.is_file() {
                debug!("Using user config file {}", path.display());
                return Ok(Some(path));
            }
        }

        Ok(None)
    }

    /// Default user config path for the platform
    pub fn user_config_path(&self) -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(&self.app_name).join("config.toml"))
    }

    fn require_existing(path: PathBuf, source: &str) -> Result<Option<PathBuf>> {
        if path.is_file() {
            Ok(Some(path))
        } else {
            Err(Error::Config(format!(
                "Config file from {} not found: {}",
                source,
                path.display()
            )))
        }
    }
}

/// Load and deserialize a TOML config file
pub fn load_toml_config<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;

    let config = toml::from_str(&content).map_err(|source| Error::TomlParse {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Resolve and load a config file, falling back to `T::default()`
pub fn load_or_default<T>(resolver: &ConfigFileResolver, cli_arg: Option<&Path>) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    match resolver.resolve(cli_arg)? {
        Some(path) => load_toml_config(&path),
        None => {
            debug!("No config file found, using compiled defaults");
            Ok(T::default())
        }
    }
}
