//! Shared helpers for the hook integration tests

#![allow(dead_code)]

use decorator_buildpack::buildpack::{
    Buildpack, BuildpackLoader, BuildpackSet, CompileDirs, DelegateError,
};
use decorator_buildpack::{HookConfig, StagingContext};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::TempDir;

/// A staging sandbox: flag dir, staging info and plugin config all live in a tempdir
pub struct Sandbox {
    pub temp: TempDir,
    pub config: HookConfig,
}

impl Sandbox {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let config = HookConfig {
            config_glob: format!("{}/staging/*/plugin_config", temp.path().display()),
            staging_info_file: temp.path().join("staged").join("staging_info.yml"),
            flag_dir: temp.path().to_path_buf(),
            ..HookConfig::default()
        };
        Self { temp, config }
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    pub fn context(&self, version: &str) -> StagingContext {
        StagingContext::new(self.config.clone(), Some(vcap_application(version)))
    }

    pub fn flag_path(&self, version: &str) -> PathBuf {
        self.config.flag_path(version)
    }

    /// Writes `staging/<task>/plugin_config` and returns its path
    pub fn write_plugin_config(&self, task: &str, content: &str) -> PathBuf {
        let dir = self.path().join("staging").join(task);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("plugin_config");
        fs::write(&path, content).unwrap();
        path
    }

    pub fn write_staging_info(&self, content: &str) {
        let path = &self.config.staging_info_file;
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    pub fn mkdir(&self, name: &str) -> PathBuf {
        let dir = self.path().join(name);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    pub fn compile_dirs(&self) -> CompileDirs {
        CompileDirs::new(self.mkdir("app"), self.mkdir("cache"))
    }
}

pub fn vcap_application(version: &str) -> String {
    format!(
        r#"{{"application_version":"{}","application_name":"demo"}}"#,
        version
    )
}

/// How the scripted delegate behaves
#[derive(Debug, Clone)]
pub enum Outcome {
    Success,
    NoAppDetected,
    CompileFails(String),
    SaveFails(String),
}

/// Shared record of what the delegate was asked to do
#[derive(Debug, Default)]
pub struct Journal {
    pub calls: Vec<String>,
    pub flag_set_during_compile: Option<bool>,
    pub config_file: Option<PathBuf>,
}

/// In-memory [`BuildpackLoader`] that records each call
pub struct ScriptedLoader {
    outcome: Outcome,
    flag_path: PathBuf,
    journal: Rc<RefCell<Journal>>,
}

impl ScriptedLoader {
    pub fn new(outcome: Outcome, flag_path: PathBuf) -> Self {
        Self {
            outcome,
            flag_path,
            journal: Rc::new(RefCell::new(Journal::default())),
        }
    }

    pub fn journal(&self) -> Rc<RefCell<Journal>> {
        Rc::clone(&self.journal)
    }
}

impl BuildpackLoader for ScriptedLoader {
    fn load(
        &self,
        config_file: &Path,
        _dirs: &CompileDirs,
    ) -> Result<Box<dyn BuildpackSet>, DelegateError> {
        {
            let mut journal = self.journal.borrow_mut();
            journal.calls.push("load".to_string());
            journal.config_file = Some(config_file.to_path_buf());
        }
        Ok(Box::new(ScriptedSet {
            buildpack: ScriptedBuildpack {
                outcome: self.outcome.clone(),
                flag_path: self.flag_path.clone(),
                journal: Rc::clone(&self.journal),
            },
        }))
    }
}

struct ScriptedSet {
    buildpack: ScriptedBuildpack,
}

impl BuildpackSet for ScriptedSet {
    fn build_pack(&self) -> Result<&dyn Buildpack, DelegateError> {
        self.buildpack.record("build_pack");
        match self.buildpack.outcome {
            Outcome::NoAppDetected => Err(DelegateError::NoAppDetected),
            _ => Ok(&self.buildpack),
        }
    }

    fn save_buildpack_info(&self) -> Result<(), DelegateError> {
        self.buildpack.record("save_buildpack_info");
        match &self.buildpack.outcome {
            Outcome::SaveFails(message) => Err(anyhow::anyhow!(message.clone()).into()),
            _ => Ok(()),
        }
    }
}

struct ScriptedBuildpack {
    outcome: Outcome,
    flag_path: PathBuf,
    journal: Rc<RefCell<Journal>>,
}

impl ScriptedBuildpack {
    fn record(&self, call: &str) {
        self.journal.borrow_mut().calls.push(call.to_string());
    }
}

impl Buildpack for ScriptedBuildpack {
    fn name(&self) -> &str {
        "scripted"
    }

    fn compile(&self) -> Result<(), DelegateError> {
        self.record("compile");
        self.journal.borrow_mut().flag_set_during_compile = Some(self.flag_path.exists());
        match &self.outcome {
            Outcome::CompileFails(message) => Err(DelegateError::ScriptFailed {
                buildpack: "scripted".to_string(),
                script: "compile".to_string(),
                status: message.clone(),
            }),
            _ => Ok(()),
        }
    }
}

/// Writes an executable `bin/<script>` under `buildpack_dir`
#[cfg(unix)]
pub fn write_script(buildpack_dir: &Path, script: &str, body: &str) {
    use std::os::unix::fs::PermissionsExt;

    let bin = buildpack_dir.join("bin");
    fs::create_dir_all(&bin).unwrap();
    let path = bin.join(script);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
}
