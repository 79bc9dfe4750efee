//! Request-scoped staging context
//!
//! One `StagingContext` lives for one hook invocation. It captures the raw
//! `VCAP_APPLICATION` value at construction and memoizes the parsed
//! application version and the staging info the first time they are needed.

use crate::config::HookConfig;
use crate::guard::CompilingFlag;
use crate::staging_info::{StagingInfo, StagingInfoError};
use serde::Deserialize;
use std::cell::OnceCell;
use std::env;
use thiserror::Error;
use tracing::debug;

/// Environment variable carrying the application description
pub const VCAP_APPLICATION_ENV: &str = "VCAP_APPLICATION";

/// Errors reading the application identity
#[derive(Debug, Error)]
pub enum VcapError {
    #[error("VCAP_APPLICATION is not set")]
    Missing,

    #[error("VCAP_APPLICATION is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("VCAP_APPLICATION has an unusable application_version: {0:?}")]
    InvalidVersion(String),
}

/// The subset of `VCAP_APPLICATION` the hooks care about
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct VcapApplication {
    pub application_version: String,
}

impl VcapApplication {
    /// Parses the JSON object and checks the version can name a flag file
    pub fn parse(raw: &str) -> Result<Self, VcapError> {
        let app: VcapApplication = serde_json::from_str(raw)?;
        if app.application_version.is_empty()
            || app.application_version.contains(['/', '\\'])
            || app.application_version == ".."
        {
            return Err(VcapError::InvalidVersion(app.application_version));
        }
        Ok(app)
    }
}

/// Per-invocation state shared by the lifecycle hooks
#[derive(Debug)]
pub struct StagingContext {
    config: HookConfig,
    vcap_application: Option<String>,
    application_version: OnceCell<String>,
    staging_info: OnceCell<StagingInfo>,
}

impl StagingContext {
    /// Creates a context with an explicit `VCAP_APPLICATION` value
    pub fn new(config: HookConfig, vcap_application: Option<String>) -> Self {
        Self {
            config,
            vcap_application,
            application_version: OnceCell::new(),
            staging_info: OnceCell::new(),
        }
    }

    /// Creates a context reading `VCAP_APPLICATION` from the process environment
    pub fn from_env(config: HookConfig) -> Self {
        Self::new(config, env::var(VCAP_APPLICATION_ENV).ok())
    }

    pub fn config(&self) -> &HookConfig {
        &self.config
    }

    /// Application version, parsed on first use
    pub fn application_version(&self) -> Result<&str, VcapError> {
        if let Some(version) = self.application_version.get() {
            return Ok(version);
        }

        let raw = self.vcap_application.as_deref().ok_or(VcapError::Missing)?;
        let app = VcapApplication::parse(raw)?;
        debug!("Application version: {}", app.application_version);

        Ok(self
            .application_version
            .get_or_init(|| app.application_version))
    }

    /// Compiling flag for the current application version
    pub fn compiling_flag(&self) -> Result<CompilingFlag, VcapError> {
        let version = self.application_version()?;
        Ok(CompilingFlag::new(self.config.flag_path(version)))
    }

    /// Staging info, loaded on first use
    pub fn staging_info(&self) -> Result<&StagingInfo, StagingInfoError> {
        if let Some(info) = self.staging_info.get() {
            return Ok(info);
        }

        let info = StagingInfo::load(&self.config.staging_info_file)?;
        Ok(self.staging_info.get_or_init(|| info))
    }
}
