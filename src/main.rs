// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app_config::{BackendProvider, Config};
use app_controller::Controller;

mod app_config;
mod app_controller;
mod errors;
mod file_utils;
mod language_utils;
mod providers;
mod subtitle_processor;
mod translation;

/// CLI Wrapper for BackendProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliBackendProvider {
    Local,
    Google,
}

impl From<CliBackendProvider> for BackendProvider {
    fn from(cli_provider: CliBackendProvider) -> Self {
        match cli_provider {
            CliBackendProvider::Local => BackendProvider::Local,
            CliBackendProvider::Google => BackendProvider::Google,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a folder of subtitle files (default command)
    #[command(alias = "translate")]
    Translate(TranslateArgs),

    /// Generate shell completions for subrelay
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Root folder holding <item>/<source-language>/ subtitle folders
    #[arg(value_name = "ROOT_PATH")]
    root_path: PathBuf,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Translation backend to use
    #[arg(short, long, value_enum)]
    backend: Option<CliBackendProvider>,

    /// Source language code (e.g. 'zh', 'zh_hans')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g. 'en', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Max files translated concurrently
    #[arg(short = 'j', long)]
    concurrent_files: Option<usize>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// subrelay - batch subtitle translation
///
/// Translates folders of subtitle files through a translation backend while
/// preserving indices, timecodes and blank separators line for line.
#[derive(Parser, Debug)]
#[command(name = "subrelay")]
#[command(version = "0.3.0")]
#[command(about = "Batch subtitle translation tool")]
#[command(long_about = "subrelay walks a folder of subtitle libraries and translates every file
through a translation backend, writing output whose structure mirrors
the input line for line.

EXAMPLES:
    subrelay ./AllSerials                      # Translate using default config
    subrelay -f ./AllSerials                   # Force overwrite existing files
    subrelay -b google ./AllSerials            # Use Google Cloud Translation
    subrelay -s zh_hans -t en ./AllSerials     # Translate Simplified Chinese to English
    subrelay -j 8 ./AllSerials                 # Up to 8 files in flight
    subrelay completions bash > subrelay.bash  # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.

FOLDER CONVENTION:
    <root>/<item>/<source-language>/*.srt is read;
    <root>/<item>/<target-language>/ is created and populated.

SUPPORTED BACKENDS:
    local     - Self-hosted inference server (default: http://127.0.0.1:5000)
    google    - Google Cloud Translation v3 (requires project id and token)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Root folder holding <item>/<source-language>/ subtitle folders
    #[arg(value_name = "ROOT_PATH")]
    root_path: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Translation backend to use
    #[arg(short, long, value_enum)]
    backend: Option<CliBackendProvider>,

    /// Source language code (e.g. 'zh', 'zh_hans')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g. 'en', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Max files translated concurrently
    #[arg(short = 'j', long)]
    concurrent_files: Option<usize>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subrelay", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let root_path = cli.root_path.ok_or_else(|| {
                anyhow!("ROOT_PATH is required when no subcommand is specified")
            })?;

            let translate_args = TranslateArgs {
                root_path,
                force_overwrite: cli.force_overwrite,
                backend: cli.backend,
                source_language: cli.source_language,
                target_language: cli.target_language,
                concurrent_files: cli.concurrent_files,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_translate(translate_args).await
        }
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&config_log_level));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Override config with CLI options if provided
    if let Some(backend) = &options.backend {
        config.backend.provider = backend.clone().into();
    }
    if let Some(source_lang) = &options.source_language {
        config.source_language = source_lang.clone();
    }
    if let Some(target_lang) = &options.target_language {
        config.target_language = target_lang.clone();
    }
    if let Some(concurrent_files) = options.concurrent_files {
        config.concurrent_files = concurrent_files;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    let controller = Controller::with_config(config)?.force_overwrite(options.force_overwrite);
    let report = controller.run(&options.root_path).await?;

    // Non-zero exit only after every discovered file has been attempted
    if report.has_failures() {
        std::process::exit(1);
    }

    Ok(())
}
