//! Locates the staging plugin configuration file

use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LocateError {
    #[error("No config file matches {pattern}")]
    NotFound { pattern: String },

    #[error("Invalid config file pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

/// Returns the first path matching `pattern`, in lexical order
///
/// Entries that cannot be read while walking the pattern are skipped.
pub fn find_config_file(pattern: &str) -> Result<PathBuf, LocateError> {
    let paths = glob::glob(pattern).map_err(|source| LocateError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;

    for entry in paths {
        match entry {
            Ok(path) => {
                debug!("Found config file: {}", path.display());
                return Ok(path);
            }
            Err(e) => debug!("Skipping unreadable config candidate: {}", e),
        }
    }

    Err(LocateError::NotFound {
        pattern: pattern.to_string(),
    })
}
