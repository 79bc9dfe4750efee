//! Lifecycle hook dispatcher: detect, compile and release
//!
//! Each hook returns an explicit [`Result`]; only the CLI layer turns it into
//! output and an exit code.
//!
//! # Example
//!
//! ```no_run
//! use decorator_buildpack::buildpack::{CompileDirs, ProcessBuildpackLoader};
//! use decorator_buildpack::{HookConfig, LifecycleHooks, StagingContext};
//!
//! let context = StagingContext::from_env(HookConfig::default());
//! let hooks = LifecycleHooks::new(context, ProcessBuildpackLoader);
//!
//! hooks.compile(&CompileDirs::new("/tmp/app", "/tmp/cache"))?;
//! # Ok::<(), decorator_buildpack::HookError>(())
//! ```

use crate::buildpack::{BuildpackLoader, CompileDirs};
use crate::context::StagingContext;
use crate::error::{HookError, Result};
use crate::locator::find_config_file;
use crate::staging_info::ReleaseInfo;
use std::path::Path;
use tracing::{debug, info};

pub struct LifecycleHooks<L> {
    context: StagingContext,
    loader: L,
}

impl<L: BuildpackLoader> LifecycleHooks<L> {
    pub fn new(context: StagingContext, loader: L) -> Self {
        Self { context, loader }
    }

    pub fn context(&self) -> &StagingContext {
        &self.context
    }

    /// Claims the staging attempt unless a compile is already running
    ///
    /// Never touches the buildpack library or the filesystem beyond checking
    /// the compiling flag.
    pub fn detect(&self, build_dir: &Path) -> Result<()> {
        debug!("Detect for {}", build_dir.display());

        let flag = self.context.compiling_flag()?;
        if flag.is_set() {
            debug!("Compiling flag present: {}", flag.path().display());
            return Err(HookError::AlreadyCompiling);
        }
        Ok(())
    }

    /// Runs the delegate buildpack while holding the compiling flag
    ///
    /// The flag is cleared before this returns, whatever the outcome.
    pub fn compile(&self, dirs: &CompileDirs) -> Result<()> {
        let flag = self.context.compiling_flag()?;
        let _guard = flag.acquire().map_err(HookError::Flag)?;

        let config_file = find_config_file(&self.context.config().config_glob)?;
        info!("Using plugin config {}", config_file.display());

        let buildpacks = self.loader.load(&config_file, dirs)?;
        let buildpack = buildpacks.build_pack()?;
        info!("Compiling with detected buildpack {}", buildpack.name());
        buildpack.compile()?;
        buildpacks.save_buildpack_info()?;

        info!("Compile finished for {}", dirs.build_dir.display());
        Ok(())
    }

    /// Builds the release descriptor from the staged application info
    pub fn release(&self, build_dir: &Path) -> Result<ReleaseInfo> {
        debug!("Release for {}", build_dir.display());
        Ok(self.context.staging_info()?.release_info())
    }
}
