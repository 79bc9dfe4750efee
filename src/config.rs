//! Configuration for the decorator buildpack hooks
//!
//! The staging paths are fixed by the DEA staging layout; `HookConfig::default()`
//! always yields them. Only the log level is read from the environment.
//!
//! # Environment Variables
//!
//! - `DECORATOR_LOG_LEVEL`: Logging level - default: "warn"
//! - `VCAP_APPLICATION`: read by [`crate::context::StagingContext`], not here
//!
//! Library callers (and tests) can build a `HookConfig` pointing somewhere else:
//!
//! ```
//! use decorator_buildpack::HookConfig;
//! use std::path::PathBuf;
//!
//! let config = HookConfig {
//!     flag_dir: PathBuf::from("/var/tmp"),
//!     ..HookConfig::default()
//! };
//! assert_eq!(
//!     config.flag_path("abc123"),
//!     PathBuf::from("/var/tmp/decorator-abc123-compiling")
//! );
//! ```

use std::env;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Glob that matches the staging plugin configuration written by the DEA
pub const CONFIG_GLOB: &str = "/var/vcap/data/dea_next/staging/*/plugin_config";

/// Where the staging process leaves its description of the staged app
pub const STAGING_INFO_FILE: &str = "/tmp/staged/staging_info.yml";

/// Directory holding the compiling flags
pub const FLAG_DIR: &str = "/tmp";

/// Identifier printed by a successful detect
pub const IDENTIFIER: &str = "decorator-buildpack";

const FLAG_PREFIX: &str = "decorator-";
const FLAG_SUFFIX: &str = "-compiling";
const DEFAULT_LOG_LEVEL: &str = "warn";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// The config glob is not a valid pattern
    #[error("Invalid config file pattern '{pattern}': {error}")]
    InvalidPattern { pattern: String, error: String },
}

/// Paths and identifiers used by the lifecycle hooks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookConfig {
    /// Glob searched for the plugin configuration file
    pub config_glob: String,

    /// YAML file describing the staged application
    pub staging_info_file: PathBuf,

    /// Directory where compiling flags are created
    pub flag_dir: PathBuf,

    /// String printed on stdout by a successful detect
    pub identifier: String,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for HookConfig {
    fn default() -> Self {
        let log_level = env::var(crate::util::logging::LOG_LEVEL_ENV)
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            config_glob: CONFIG_GLOB.to_string(),
            staging_info_file: PathBuf::from(STAGING_INFO_FILE),
            flag_dir: PathBuf::from(FLAG_DIR),
            identifier: IDENTIFIER.to_string(),
            log_level,
        }
    }
}

impl HookConfig {
    /// Validates the configuration
    ///
    /// Checks that the log level is known and the config glob compiles.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if crate::util::logging::try_parse_level(&self.log_level).is_none() {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                self.log_level
            )));
        }

        if let Err(e) = glob::Pattern::new(&self.config_glob) {
            return Err(ConfigError::InvalidPattern {
                pattern: self.config_glob.clone(),
                error: e.to_string(),
            });
        }

        if self.identifier.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Detect identifier cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Path of the compiling flag for one application version
    pub fn flag_path(&self, application_version: &str) -> PathBuf {
        self.flag_dir.join(format!(
            "{}{}{}",
            FLAG_PREFIX, application_version, FLAG_SUFFIX
        ))
    }
}

impl fmt::Display for HookConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Decorator Buildpack Configuration:")?;
        writeln!(f, "  Config Glob: {}", self.config_glob)?;
        writeln!(f, "  Staging Info: {}", self.staging_info_file.display())?;
        writeln!(f, "  Flag Dir: {}", self.flag_dir.display())?;
        writeln!(f, "  Identifier: {}", self.identifier)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}
