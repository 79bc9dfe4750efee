use decorator_buildpack::buildpack::ProcessBuildpackLoader;
use decorator_buildpack::cli::{handle_compile, handle_detect, handle_release, CliArgs, Commands};
use decorator_buildpack::util::logging::init_logging;
use decorator_buildpack::{HookConfig, LifecycleHooks, StagingContext, NAME, VERSION};

use clap::Parser;
use std::io;
use std::process;
use tracing::{debug, error};

fn main() {
    let args = CliArgs::parse();
    let mut config = HookConfig::default();
    init_logging_from_args(&args, &mut config);

    debug!("{} v{} starting", NAME, VERSION);
    debug!("Arguments: {:?}", args);
    debug!("{}", config);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        process::exit(1);
    }

    let hooks = LifecycleHooks::new(StagingContext::from_env(config), ProcessBuildpackLoader);

    let stdout = io::stdout();
    let stderr = io::stderr();
    let exit_code = match &args.command {
        Commands::Detect(detect_args) => {
            handle_detect(&hooks, detect_args, &mut stdout.lock(), &mut stderr.lock())
        }
        Commands::Compile(compile_args) => {
            handle_compile(&hooks, compile_args, &mut stderr.lock())
        }
        Commands::Release(release_args) => {
            handle_release(&hooks, release_args, &mut stdout.lock(), &mut stderr.lock())
        }
    };

    process::exit(exit_code);
}

/// Initializes logging and records the level actually in effect on `config`
fn init_logging_from_args(args: &CliArgs, config: &mut HookConfig) {
    let logging = args.logging_config(&config.log_level);
    config.log_level = logging.level.to_string().to_lowercase();
    init_logging(logging);
}
