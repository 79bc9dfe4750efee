//! Staging plugin configuration written by the DEA for each staging task

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_DEST_DIR: &str = "/tmp/staged";
const DEFAULT_STAGING_INFO_NAME: &str = "staging_info.yml";

fn default_dest_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DEST_DIR)
}

fn default_staging_info_name() -> String {
    DEFAULT_STAGING_INFO_NAME.to_string()
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PluginConfig {
    /// Application source; overrides the hook's build dir when present
    #[serde(default)]
    pub source_dir: Option<PathBuf>,

    /// Where the staging info is written
    #[serde(default = "default_dest_dir")]
    pub dest_dir: PathBuf,

    #[serde(default = "default_staging_info_name")]
    pub staging_info_name: String,

    /// Buildpack cache; overrides the hook's cache dir when present
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Installed buildpacks, in detection order
    #[serde(default)]
    pub buildpack_dirs: Vec<PathBuf>,

    #[serde(default)]
    pub environment: PluginEnvironment,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct PluginEnvironment {
    /// Buildpack explicitly requested by the application, by directory name
    #[serde(default)]
    pub buildpack: Option<String>,
}

impl PluginConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read plugin config {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse plugin config {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn staging_info_path(&self) -> PathBuf {
        self.dest_dir.join(&self.staging_info_name)
    }

    pub fn requested_buildpack(&self) -> Option<&str> {
        self.environment
            .buildpack
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
    }
}
