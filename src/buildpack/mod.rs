//! Buildpack delegate
//!
//! The hooks never pick or run buildpacks themselves. They hand the plugin
//! configuration to a [`BuildpackLoader`], ask the resulting [`BuildpackSet`]
//! for the matching [`Buildpack`], compile it, and ask the set to persist what
//! was selected.
//!
//! [`ProcessBuildpackLoader`] is the production implementation: it drives
//! installed buildpacks through their `bin/detect`, `bin/decorate`,
//! `bin/compile` and `bin/release` scripts.

pub mod label;
pub mod plugin_config;
pub mod process;

use std::path::PathBuf;
use thiserror::Error;

pub use label::describe_selection;
pub use plugin_config::PluginConfig;
pub use process::{ProcessBuildpackLoader, ProcessBuildpacks};

/// Errors reported by a buildpack delegate
#[derive(Debug, Error)]
pub enum DelegateError {
    /// No installed buildpack accepted the application
    #[error("No buildpack detected for the application")]
    NoAppDetected,

    /// A buildpack script exited unsuccessfully
    #[error("Buildpack '{buildpack}' failed in bin/{script}: {status}")]
    ScriptFailed {
        buildpack: String,
        script: String,
        status: String,
    },

    /// A required buildpack script is not there
    #[error("Buildpack script not found: {0}")]
    ScriptMissing(PathBuf),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Directories handed to the compile hook by the staging orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileDirs {
    pub build_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub env_dir: Option<PathBuf>,
}

impl CompileDirs {
    pub fn new(build_dir: impl Into<PathBuf>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            build_dir: build_dir.into(),
            cache_dir: cache_dir.into(),
            env_dir: None,
        }
    }

    pub fn with_env_dir(mut self, env_dir: impl Into<PathBuf>) -> Self {
        self.env_dir = Some(env_dir.into());
        self
    }
}

/// A buildpack chosen for the application
pub trait Buildpack {
    fn name(&self) -> &str;

    fn compile(&self) -> Result<(), DelegateError>;
}

/// The buildpacks described by one plugin configuration
pub trait BuildpackSet {
    /// Picks the buildpack matching the application
    ///
    /// Returns [`DelegateError::NoAppDetected`] when none matches. The choice
    /// is memoized, so later calls and `save_buildpack_info` see the same one.
    fn build_pack(&self) -> Result<&dyn Buildpack, DelegateError>;

    /// Persists metadata about the selected buildpack for the release phase
    fn save_buildpack_info(&self) -> Result<(), DelegateError>;
}

/// Builds a [`BuildpackSet`] from a plugin configuration file
pub trait BuildpackLoader {
    fn load(
        &self,
        config_file: &std::path::Path,
        dirs: &CompileDirs,
    ) -> Result<Box<dyn BuildpackSet>, DelegateError>;
}
