//! decorator-buildpack - staging hooks for the DEA decorator buildpack
//!
//! The decorator buildpack sits among the installed buildpacks of a DEA
//! staging environment. It claims every application during detect, then in
//! compile hands the real work back to the buildpack library: the matching
//! buildpack is detected and compiled, decorators get their turn, and the
//! staging info is saved. Release reports the staged start command.
//!
//! # Core Concepts
//!
//! - **Compiling flag**: a marker file keyed by application version. While it
//!   exists, detect declines, so the decorator does not pick itself again when
//!   the buildpack library re-runs detection during compile.
//! - **Buildpack delegate**: the [`buildpack::BuildpackLoader`] seam. The
//!   production loader runs buildpack `bin/*` scripts.
//! - **Staging context**: per-invocation state ([`StagingContext`]) that reads
//!   `VCAP_APPLICATION` and the staging info at most once.
//!
//! # Example Usage
//!
//! ```no_run
//! use decorator_buildpack::buildpack::ProcessBuildpackLoader;
//! use decorator_buildpack::{HookConfig, LifecycleHooks, StagingContext};
//! use std::path::Path;
//!
//! let hooks = LifecycleHooks::new(
//!     StagingContext::from_env(HookConfig::default()),
//!     ProcessBuildpackLoader,
//! );
//!
//! let release = hooks.release(Path::new("/tmp/app"))?;
//! println!("web: {:?}", release.web_command());
//! # Ok::<(), decorator_buildpack::HookError>(())
//! ```

pub mod buildpack;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod guard;
pub mod hooks;
pub mod locator;
pub mod staging_info;
pub mod util;

pub use config::{ConfigError, HookConfig};
pub use context::{StagingContext, VcapApplication, VcapError};
pub use error::{HookError, Result};
pub use guard::{CompilingFlag, CompilingGuard};
pub use hooks::LifecycleHooks;
pub use staging_info::{ReleaseInfo, StagingInfo};
pub use util::{init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name() {
        assert_eq!(NAME, "decorator-buildpack");
    }
}
