//! Error taxonomy for the lifecycle hooks
//!
//! Every failure ends the current invocation with exit code 1. What differs is
//! what the staging log gets to see: some failures are silent signals to the
//! orchestrator, the rest explain themselves on stderr.

use crate::buildpack::DelegateError;
use crate::context::VcapError;
use crate::locator::LocateError;
use crate::staging_info::StagingInfoError;
use thiserror::Error;

/// Exit code for every failed hook
pub const FAILURE_EXIT_CODE: i32 = 1;

/// Exit code for a successful hook
pub const SUCCESS_EXIT_CODE: i32 = 0;

/// Result type alias for hook operations
pub type Result<T> = std::result::Result<T, HookError>;

#[derive(Debug, Error)]
pub enum HookError {
    /// A compile for this application version is already running
    #[error("A compile is already in progress for this application version")]
    AlreadyCompiling,

    /// No staging plugin config matched the search pattern
    #[error("Decorator-buildpack could not find config file matching {pattern}")]
    ConfigNotFound { pattern: String },

    /// The buildpack library found no buildpack for the application
    #[error("No buildpack detected for the application")]
    NoAppDetected,

    #[error(transparent)]
    Delegate(DelegateError),

    #[error(transparent)]
    Application(#[from] VcapError),

    #[error(transparent)]
    StagingInfo(#[from] StagingInfoError),

    #[error("Compiling flag error: {0}")]
    Flag(#[source] std::io::Error),

    #[error(transparent)]
    Locate(LocateError),
}

impl From<DelegateError> for HookError {
    fn from(e: DelegateError) -> Self {
        match e {
            DelegateError::NoAppDetected => HookError::NoAppDetected,
            other => HookError::Delegate(other),
        }
    }
}

impl From<LocateError> for HookError {
    fn from(e: LocateError) -> Self {
        match e {
            LocateError::NotFound { pattern } => HookError::ConfigNotFound { pattern },
            other => HookError::Locate(other),
        }
    }
}

impl HookError {
    /// Lines written to stderr for this failure
    ///
    /// Empty for the failures the orchestrator expects and handles itself.
    pub fn diagnostics(&self) -> Vec<String> {
        match self {
            HookError::AlreadyCompiling | HookError::NoAppDetected => Vec::new(),
            HookError::ConfigNotFound { .. } => vec![
                "Decorator-buildpack could not find config file".to_string(),
                "No decorators will be run".to_string(),
            ],
            other => vec![other.to_string()],
        }
    }

    pub fn exit_code(&self) -> i32 {
        FAILURE_EXIT_CODE
    }

    /// Whether this failure is an expected signal rather than a fault
    pub fn is_silent(&self) -> bool {
        self.diagnostics().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_errors() {
        assert!(HookError::AlreadyCompiling.is_silent());
        assert!(HookError::NoAppDetected.is_silent());
        assert!(HookError::AlreadyCompiling.diagnostics().is_empty());
    }

    #[test]
    fn test_config_not_found_diagnostics() {
        let err = HookError::ConfigNotFound {
            pattern: "/var/vcap/data/dea_next/staging/*/plugin_config".to_string(),
        };
        assert_eq!(
            err.diagnostics(),
            vec![
                "Decorator-buildpack could not find config file".to_string(),
                "No decorators will be run".to_string(),
            ]
        );
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_no_app_detected_conversion() {
        let err: HookError = DelegateError::NoAppDetected.into();
        assert!(matches!(err, HookError::NoAppDetected));
    }

    #[test]
    fn test_locate_not_found_conversion() {
        let err: HookError = LocateError::NotFound {
            pattern: "/nowhere/*".to_string(),
        }
        .into();
        assert!(matches!(err, HookError::ConfigNotFound { .. }));
    }

    #[test]
    fn test_delegate_error_message_is_reported() {
        let err: HookError = DelegateError::ScriptFailed {
            buildpack: "ruby".to_string(),
            script: "compile".to_string(),
            status: "exit code 2".to_string(),
        }
        .into();
        assert_eq!(
            err.diagnostics(),
            vec!["Buildpack 'ruby' failed in bin/compile: exit code 2".to_string()]
        );
        assert_eq!(err.exit_code(), FAILURE_EXIT_CODE);
    }

    #[test]
    fn test_application_error_is_reported() {
        let err: HookError = VcapError::Missing.into();
        assert_eq!(err.diagnostics(), vec!["VCAP_APPLICATION is not set".to_string()]);
    }
}
