//! Staging info and the release descriptor derived from it

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Process type the start command is published under
pub const WEB_PROCESS: &str = "web";

#[derive(Debug, Error)]
pub enum StagingInfoError {
    #[error("Failed to read staging info {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse staging info {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to write staging info {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Description of the staged application, as left by the staging process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagingInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_buildpack: Option<String>,

    pub start_command: String,
}

impl StagingInfo {
    pub fn new(start_command: impl Into<String>) -> Self {
        Self {
            detected_buildpack: None,
            start_command: start_command.into(),
        }
    }

    pub fn with_detected_buildpack(mut self, label: impl Into<String>) -> Self {
        self.detected_buildpack = Some(label.into());
        self
    }

    /// Reads and parses a staging info YAML file
    pub fn load(path: &Path) -> Result<Self, StagingInfoError> {
        debug!("Reading staging info from {}", path.display());
        let content = fs::read_to_string(path).map_err(|source| StagingInfoError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| StagingInfoError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Writes the staging info as YAML, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<(), StagingInfoError> {
        let write_err = |source| StagingInfoError::Write {
            path: path.to_path_buf(),
            source,
        };

        let content = serde_yaml::to_string(self).map_err(|source| StagingInfoError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(path, content).map_err(write_err)?;
        debug!("Staging info written to {}", path.display());
        Ok(())
    }

    pub fn release_info(&self) -> ReleaseInfo {
        ReleaseInfo::web(self.start_command.clone())
    }
}

/// Release descriptor: process type to start command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseInfo {
    #[serde(default)]
    pub default_process_types: BTreeMap<String, String>,
}

impl ReleaseInfo {
    pub fn web(start_command: impl Into<String>) -> Self {
        let mut default_process_types = BTreeMap::new();
        default_process_types.insert(WEB_PROCESS.to_string(), start_command.into());
        Self {
            default_process_types,
        }
    }

    pub fn web_command(&self) -> Option<&str> {
        self.default_process_types
            .get(WEB_PROCESS)
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_staging_info() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("staging_info.yml");
        fs::write(
            &path,
            "---\ndetected_buildpack: Ruby/Rails\nstart_command: bundle exec rails s\n",
        )
        .unwrap();

        let info = StagingInfo::load(&path).unwrap();
        assert_eq!(info.start_command, "bundle exec rails s");
        assert_eq!(info.detected_buildpack.as_deref(), Some("Ruby/Rails"));
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = StagingInfo::load(&temp.path().join("nope.yml")).unwrap_err();
        assert!(matches!(err, StagingInfoError::Read { .. }));
        assert!(err.to_string().contains("nope.yml"));
    }

    #[test]
    fn test_load_without_start_command() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("staging_info.yml");
        fs::write(&path, "detected_buildpack: Go\n").unwrap();

        let err = StagingInfo::load(&path).unwrap_err();
        assert!(matches!(err, StagingInfoError::Parse { .. }));
        assert!(err.to_string().contains("start_command"));
    }

    #[test]
    fn test_release_info_shape() {
        let release = StagingInfo::new("bundle exec rails s").release_info();
        let json = serde_json::to_value(&release).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"default_process_types": {"web": "bundle exec rails s"}})
        );
        assert_eq!(release.web_command(), Some("bundle exec rails s"));
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("staged/staging_info.yml");

        StagingInfo::new("node server.js")
            .with_detected_buildpack("node.js (no decorators apply)")
            .save(&path)
            .unwrap();

        let loaded = StagingInfo::load(&path).unwrap();
        assert_eq!(loaded.start_command, "node server.js");
        assert_eq!(
            loaded.detected_buildpack.as_deref(),
            Some("node.js (no decorators apply)")
        );
    }
}
