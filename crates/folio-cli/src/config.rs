//! CLI configuration
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults
//! 2. The TOML file named by `$FOLIO_CONFIG`, else `folio.toml` in the
//!    working directory (a missing `folio.toml` is not an error)
//! 3. `FOLIO_DATABASE_PATH` and `FOLIO_LOG_PROFILE`
//! 4. The `--db` flag, applied by the caller

use std::fs;
use std::path::{Path, PathBuf};

use folio_core::logging_facility::Profile;
use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_FILE: &str = "folio.toml";
pub const ENV_CONFIG: &str = "FOLIO_CONFIG";
pub const ENV_DATABASE_PATH: &str = "FOLIO_DATABASE_PATH";
pub const ENV_LOG_PROFILE: &str = "FOLIO_LOG_PROFILE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Settings for one CLI invocation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FolioConfig {
    pub database_path: PathBuf,
    /// `development` or `production`
    pub log_profile: String,
    /// Lifetime of cached public renderings
    pub cache_ttl_secs: u64,
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(".folio/site.db"),
            log_profile: "development".to_string(),
            cache_ttl_secs: 300,
        }
    }
}

impl FolioConfig {
    /// Load configuration for a working directory from the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read or
    /// parsed, if `$FOLIO_CONFIG` names a missing file, or if a value is
    /// invalid.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        Self::load_with(dir, |key| std::env::var(key).ok())
    }

    /// Same as [`FolioConfig::load`] with an explicit environment lookup
    ///
    /// # Errors
    ///
    /// See [`FolioConfig::load`].
    pub fn load_with<F>(dir: &Path, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match env(ENV_CONFIG) {
            Some(explicit) => Self::read(Path::new(&explicit))?,
            None => {
                let path = dir.join(CONFIG_FILE);
                if path.exists() {
                    Self::read(&path)?
                } else {
                    Self::default()
                }
            }
        };

        if let Some(db) = env(ENV_DATABASE_PATH).filter(|v| !v.trim().is_empty()) {
            config.database_path = PathBuf::from(db);
        }
        if let Some(profile) = env(ENV_LOG_PROFILE).filter(|v| !v.trim().is_empty()) {
            config.log_profile = profile;
        }

        config.validate()?;
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("database_path is empty".to_string()));
        }
        self.profile()?;
        Ok(())
    }

    /// Logging profile named by `log_profile`
    ///
    /// # Errors
    ///
    /// Returns `Invalid` for an unrecognized profile name.
    pub fn profile(&self) -> Result<Profile, ConfigError> {
        self.log_profile.parse().map_err(ConfigError::Invalid)
    }
}
