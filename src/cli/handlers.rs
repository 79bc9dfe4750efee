//! Command handlers: the only place hook results become output and exit codes

use super::commands::{CompileArgs, DetectArgs, ReleaseArgs};
use super::output::{OutputFormat, OutputFormatter};
use crate::buildpack::{BuildpackLoader, CompileDirs};
use crate::error::{HookError, FAILURE_EXIT_CODE, SUCCESS_EXIT_CODE};
use crate::hooks::LifecycleHooks;
use std::io::Write;
use tracing::{debug, error};

pub fn handle_detect<L: BuildpackLoader>(
    hooks: &LifecycleHooks<L>,
    args: &DetectArgs,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> i32 {
    match hooks.detect(&args.build_dir) {
        Ok(()) => {
            let identifier = &hooks.context().config().identifier;
            if let Err(e) = writeln!(out, "{}", identifier) {
                error!("Failed to write detect output: {}", e);
                return FAILURE_EXIT_CODE;
            }
            SUCCESS_EXIT_CODE
        }
        Err(e) => report_failure("detect", &e, err),
    }
}

pub fn handle_compile<L: BuildpackLoader>(
    hooks: &LifecycleHooks<L>,
    args: &CompileArgs,
    err: &mut dyn Write,
) -> i32 {
    let mut dirs = CompileDirs::new(&args.build_dir, &args.cache_dir);
    if let Some(env_dir) = &args.env_dir {
        dirs = dirs.with_env_dir(env_dir);
    }

    match hooks.compile(&dirs) {
        Ok(()) => SUCCESS_EXIT_CODE,
        Err(e) => report_failure("compile", &e, err),
    }
}

pub fn handle_release<L: BuildpackLoader>(
    hooks: &LifecycleHooks<L>,
    args: &ReleaseArgs,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> i32 {
    let release = match hooks.release(&args.build_dir) {
        Ok(release) => release,
        Err(e) => return report_failure("release", &e, err),
    };

    let format: OutputFormat = args.format.into();
    let output = match OutputFormatter::new(format).format_release(&release) {
        Ok(output) => output,
        Err(e) => {
            let _ = writeln!(err, "Failed to format release: {}", e);
            return FAILURE_EXIT_CODE;
        }
    };

    if let Err(e) = out.write_all(output.as_bytes()) {
        let _ = writeln!(err, "Failed to write release: {}", e);
        return FAILURE_EXIT_CODE;
    }
    SUCCESS_EXIT_CODE
}

fn report_failure(hook: &str, e: &HookError, err: &mut dyn Write) -> i32 {
    debug!("{} failed: {}", hook, e);
    for line in e.diagnostics() {
        let _ = writeln!(err, "{}", line);
    }
    e.exit_code()
}
