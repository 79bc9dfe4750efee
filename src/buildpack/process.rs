//! Buildpack delegate driving installed buildpacks through their scripts
//!
//! Every buildpack directory follows the usual layout:
//!
//! - `bin/detect <build_dir>`: exit 0 and print a name to claim the app
//! - `bin/decorate <build_dir>`: optional; exit 0 and print a name to run
//!   as a decorator after the main buildpack
//! - `bin/compile <build_dir> <cache_dir> [<env_dir>]`
//! - `bin/release <build_dir>`: YAML with `default_process_types`
//!
//! Detection output is captured so that rejected buildpacks leave no trace on
//! the staging log. Compile output is passed straight through.

use super::label::describe_selection;
use super::plugin_config::PluginConfig;
use super::{Buildpack, BuildpackLoader, BuildpackSet, CompileDirs, DelegateError};
use crate::staging_info::{ReleaseInfo, StagingInfo, WEB_PROCESS};
use anyhow::{anyhow, Context};
use std::cell::OnceCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use tracing::{debug, info};

const PROCFILE: &str = "Procfile";

/// Loads a [`ProcessBuildpacks`] set from a plugin configuration file
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessBuildpackLoader;

impl BuildpackLoader for ProcessBuildpackLoader {
    fn load(
        &self,
        config_file: &Path,
        dirs: &CompileDirs,
    ) -> Result<Box<dyn BuildpackSet>, DelegateError> {
        let config = PluginConfig::load(config_file)?;
        debug!(
            "Loaded plugin config with {} buildpacks",
            config.buildpack_dirs.len()
        );
        Ok(Box::new(ProcessBuildpacks::new(config, dirs)))
    }
}

/// Installed buildpacks described by one plugin configuration
#[derive(Debug)]
pub struct ProcessBuildpacks {
    config: PluginConfig,
    dirs: CompileDirs,
    selected: OnceCell<Selection>,
}

impl ProcessBuildpacks {
    /// `source_dir` and `cache_dir` from the plugin config take precedence over
    /// the directories the hook was invoked with.
    pub fn new(config: PluginConfig, dirs: &CompileDirs) -> Self {
        let dirs = CompileDirs {
            build_dir: config
                .source_dir
                .clone()
                .unwrap_or_else(|| dirs.build_dir.clone()),
            cache_dir: config
                .cache_dir
                .clone()
                .unwrap_or_else(|| dirs.cache_dir.clone()),
            env_dir: dirs.env_dir.clone(),
        };

        Self {
            config,
            dirs,
            selected: OnceCell::new(),
        }
    }

    pub fn dirs(&self) -> &CompileDirs {
        &self.dirs
    }

    /// The memoized selection, detecting on first use
    pub fn selection(&self) -> Result<&Selection, DelegateError> {
        if let Some(selection) = self.selected.get() {
            return Ok(selection);
        }

        let selection = self.select()?;
        Ok(self.selected.get_or_init(|| selection))
    }

    fn select(&self) -> Result<Selection, DelegateError> {
        let buildpack = match self.config.requested_buildpack() {
            Some(requested) => self.requested(requested)?,
            None => self.detect()?,
        };
        info!("Selected buildpack {}", buildpack.name);

        let decorators = self.decorators(&buildpack.dir);
        for decorator in &decorators {
            info!("Selected decorator {}", decorator.name);
        }

        Ok(Selection {
            buildpack,
            decorators,
            dirs: self.dirs.clone(),
        })
    }

    fn requested(&self, requested: &str) -> Result<ScriptBuildpack, DelegateError> {
        self.config
            .buildpack_dirs
            .iter()
            .find(|dir| dir.file_name().and_then(|n| n.to_str()) == Some(requested))
            .map(|dir| ScriptBuildpack::new(dir.clone(), requested.to_string()))
            .ok_or_else(|| anyhow!("Requested buildpack '{}' is not installed", requested).into())
    }

    fn detect(&self) -> Result<ScriptBuildpack, DelegateError> {
        for dir in &self.config.buildpack_dirs {
            if let Some(name) = probe(dir, "detect", &self.dirs.build_dir) {
                return Ok(ScriptBuildpack::new(dir.clone(), name));
            }
        }
        debug!("No buildpack accepted {}", self.dirs.build_dir.display());
        Err(DelegateError::NoAppDetected)
    }

    fn decorators(&self, selected: &Path) -> Vec<ScriptBuildpack> {
        self.config
            .buildpack_dirs
            .iter()
            .filter(|dir| dir.as_path() != selected)
            .filter_map(|dir| {
                probe(dir, "decorate", &self.dirs.build_dir)
                    .map(|name| ScriptBuildpack::new(dir.clone(), name))
            })
            .collect()
    }
}

impl BuildpackSet for ProcessBuildpacks {
    fn build_pack(&self) -> Result<&dyn Buildpack, DelegateError> {
        let selection: &dyn Buildpack = self.selection()?;
        Ok(selection)
    }

    fn save_buildpack_info(&self) -> Result<(), DelegateError> {
        let selection = self.selection()?;
        let release = selection.buildpack.release(&self.dirs.build_dir)?;

        let start_command = procfile_command(&self.dirs.build_dir, WEB_PROCESS)
            .or_else(|| release.web_command().map(str::to_string))
            .unwrap_or_else(|| {
                info!("No web start command for {}", selection.buildpack.name);
                String::new()
            });

        let staging_info =
            StagingInfo::new(start_command).with_detected_buildpack(selection.label());
        staging_info
            .save(&self.config.staging_info_path())
            .map_err(|e| DelegateError::Other(e.into()))
    }
}

/// The main buildpack and the decorators that run after it
#[derive(Debug)]
pub struct Selection {
    buildpack: ScriptBuildpack,
    decorators: Vec<ScriptBuildpack>,
    dirs: CompileDirs,
}

impl Selection {
    pub fn decorator_names(&self) -> Vec<String> {
        self.decorators.iter().map(|d| d.name.clone()).collect()
    }

    pub fn label(&self) -> String {
        describe_selection(&self.buildpack.name, &self.decorator_names())
    }
}

impl Buildpack for Selection {
    fn name(&self) -> &str {
        &self.buildpack.name
    }

    fn compile(&self) -> Result<(), DelegateError> {
        self.buildpack.compile(&self.dirs)?;
        for decorator in &self.decorators {
            decorator.compile(&self.dirs)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct ScriptBuildpack {
    dir: PathBuf,
    name: String,
}

impl ScriptBuildpack {
    fn new(dir: PathBuf, name: String) -> Self {
        Self { dir, name }
    }

    fn script(&self, script: &str) -> PathBuf {
        script_path(&self.dir, script)
    }

    fn compile(&self, dirs: &CompileDirs) -> Result<(), DelegateError> {
        let path = self.script("compile");
        if !path.is_file() {
            return Err(DelegateError::ScriptMissing(path));
        }

        info!("Compiling with {}", self.name);
        let mut command = Command::new(&path);
        command.arg(&dirs.build_dir).arg(&dirs.cache_dir);
        if let Some(env_dir) = &dirs.env_dir {
            command.arg(env_dir);
        }

        let status = command
            .stdin(Stdio::null())
            .status()
            .with_context(|| format!("Failed to run {}", path.display()))?;
        self.check(status, "compile")
    }

    fn release(&self, build_dir: &Path) -> Result<ReleaseInfo, DelegateError> {
        let path = self.script("release");
        if !path.is_file() {
            return Err(DelegateError::ScriptMissing(path));
        }

        let output = Command::new(&path)
            .arg(build_dir)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .with_context(|| format!("Failed to run {}", path.display()))?;
        self.check(output.status, "release")?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.trim().is_empty() {
            return Ok(ReleaseInfo {
                default_process_types: Default::default(),
            });
        }
        let release: ReleaseInfo = serde_yaml::from_str(&stdout)
            .with_context(|| format!("Invalid release output from {}", self.name))?;
        Ok(release)
    }

    fn check(&self, status: ExitStatus, script: &str) -> Result<(), DelegateError> {
        if status.success() {
            return Ok(());
        }
        Err(DelegateError::ScriptFailed {
            buildpack: self.name.clone(),
            script: script.to_string(),
            status: describe_status(status),
        })
    }
}

fn script_path(dir: &Path, script: &str) -> PathBuf {
    dir.join("bin").join(script)
}

/// Runs a detect-style script; `Some(name)` when it claims the build dir
///
/// A missing or unrunnable script simply does not claim anything.
fn probe(dir: &Path, script: &str, build_dir: &Path) -> Option<String> {
    let path = script_path(dir, script);
    if !path.is_file() {
        debug!("{} not found", path.display());
        return None;
    }

    let output = match Command::new(&path)
        .arg(build_dir)
        .stdin(Stdio::null())
        .output()
    {
        Ok(output) => output,
        Err(e) => {
            debug!("Failed to run {}: {}", path.display(), e);
            return None;
        }
    };

    if !output.status.success() {
        debug!("{} declined ({})", path.display(), describe_status(output.status));
        return None;
    }

    let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if name.is_empty() {
        dir.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .or_else(|| Some(dir.display().to_string()))
    } else {
        Some(name)
    }
}

/// Command for `process` from the app's Procfile, if it has one
fn procfile_command(build_dir: &Path, process: &str) -> Option<String> {
    let content = fs::read_to_string(build_dir.join(PROCFILE)).ok()?;
    content.lines().find_map(|line| {
        let (name, command) = line.split_once(':')?;
        (name.trim() == process).then(|| command.trim().to_string())
    })
}

fn describe_status(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}
