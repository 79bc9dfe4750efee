use crate::util::logging::{json_from_env, parse_level, LoggingConfig};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::Level;

/// Decorator buildpack lifecycle hooks for DEA staging
#[derive(Parser, Debug)]
#[command(
    name = "decorator-buildpack",
    about = "Decorator buildpack lifecycle hooks for DEA staging",
    version,
    long_about = "Implements the detect, compile and release phases of the decorator buildpack. \
                  Compile delegates to the installed buildpacks described by the staging plugin \
                  config, guarded by a per-application-version compiling flag.\n\n\
                  Each buildpack script is a thin shim:\n  \
                  bin/detect:  exec decorator-buildpack detect \"$@\"\n  \
                  bin/compile: exec decorator-buildpack compile \"$@\"\n  \
                  bin/release: exec decorator-buildpack release \"$@\""
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Only log errors"
    )]
    pub quiet: bool,
}

impl CliArgs {
    /// Logging setup for this invocation
    ///
    /// `--log-level` wins over `-v`/`-q`, which win over `configured_level`
    /// (normally `DECORATOR_LOG_LEVEL`). An unknown level name falls back to
    /// WARN wherever it comes from.
    pub fn logging_config(&self, configured_level: &str) -> LoggingConfig {
        let mut config = match &self.log_level {
            Some(level) => LoggingConfig::with_level(parse_level(level)),
            None if self.verbose => LoggingConfig::development(),
            None if self.quiet => LoggingConfig::with_level(Level::ERROR),
            None => LoggingConfig::with_level(parse_level(configured_level)),
        };
        config.use_json = json_from_env();
        config
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Claim the application unless a compile is already running",
        long_about = "Prints 'decorator-buildpack' and exits 0, or exits 1 without output when a \
                      compile is in progress for the application version in VCAP_APPLICATION."
    )]
    Detect(DetectArgs),

    #[command(
        about = "Compile the application with the detected buildpack and decorators",
        long_about = "Sets the compiling flag, locates the staging plugin config, detects and \
                      compiles the matching buildpack, runs any decorators, saves the staging \
                      info and clears the flag. Exits 1 on any failure."
    )]
    Compile(CompileArgs),

    #[command(
        about = "Print the release descriptor for the staged application",
        long_about = "Reads the staging info and prints the default process types, mapping \
                      'web' to the staged start command."
    )]
    Release(ReleaseArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct DetectArgs {
    #[arg(value_name = "BUILD_DIR", help = "Application build directory")]
    pub build_dir: PathBuf,
}

#[derive(Parser, Debug, Clone)]
pub struct CompileArgs {
    #[arg(value_name = "BUILD_DIR", help = "Application build directory")]
    pub build_dir: PathBuf,

    #[arg(value_name = "CACHE_DIR", help = "Buildpack cache directory")]
    pub cache_dir: PathBuf,

    #[arg(value_name = "ENV_DIR", help = "Directory of environment variable files")]
    pub env_dir: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct ReleaseArgs {
    #[arg(value_name = "BUILD_DIR", help = "Application build directory")]
    pub build_dir: PathBuf,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "yaml",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Yaml,
    Json,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Json => super::output::OutputFormat::Json,
        }
    }
}
