// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use subreflow::app_config::{self, Config, OutputFormat};
use subreflow::app_controller::Controller;
use subreflow::file_utils::FileManager;

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

/// CLI Wrapper for OutputFormat to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliOutputFormat {
    Srt,
    Txt,
    Json,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(cli_format: CliOutputFormat) -> Self {
        match cli_format {
            CliOutputFormat::Srt => OutputFormat::Srt,
            CliOutputFormat::Txt => OutputFormat::Txt,
            CliOutputFormat::Json => OutputFormat::Json,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for subreflow
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// subreflow - subtitle resegmentation
///
/// Merges fragmentary subtitle cues into readable ones and splits over-long
/// cues at natural break points, redistributing their timing.
#[derive(Parser, Debug)]
#[command(name = "subreflow")]
#[command(version)]
#[command(about = "Merge short subtitle cues and split long ones at natural break points")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "subreflow rewrites an SRT file so that every cue is comfortable to read: \
fragments shorter than --min-chars are merged, and text longer than --max-chars is split at \
sentence, clause or word boundaries with timing shared out proportionally.

EXAMPLES:
    subreflow raw.srt clean.srt                   # Resegment using default config
    subreflow -f raw.srt clean.srt                # Overwrite an existing output
    subreflow --max-chars 84 raw.srt clean.srt    # Shorter cues
    subreflow -o json raw.srt cues.json           # Write cues as JSON
    subreflow --log-level debug subs/ out/        # Process a whole directory
    subreflow completions bash > subreflow.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically. Command line options override the file.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input SRT file, or a directory of SRT files
    #[arg(value_name = "INPUT")]
    input_path: Option<PathBuf>,

    /// Output file, or output directory when INPUT is a directory
    #[arg(value_name = "OUTPUT")]
    output_path: Option<PathBuf>,

    /// Merge buffered cues until they hold at least this many characters
    #[arg(long)]
    min_chars: Option<usize>,

    /// Split cues longer than this many characters
    #[arg(long)]
    max_chars: Option<usize>,

    /// Gap in milliseconds between cues produced by one split
    #[arg(long)]
    gap_ms: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum)]
    output_format: Option<CliOutputFormat>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,
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
        // The logger itself accepts everything; log::max_level does the filtering
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌",
            Level::Warn => "🚧",
            Level::Info => " ",
            Level::Debug => "🔍",
            Level::Trace => "📋",
        }
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
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
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Info until the config has been read
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "subreflow", &mut std::io::stdout());
        return Ok(());
    }

    run_resegment(cli)
}

fn run_resegment(options: CommandLineOptions) -> Result<()> {
    let input_path = options
        .input_path
        .clone()
        .ok_or_else(|| anyhow!("INPUT is required when no subcommand is specified"))?;
    let output_path = options
        .output_path
        .clone()
        .ok_or_else(|| anyhow!("OUTPUT is required when no subcommand is specified"))?;

    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_create(&options.config_path)
        .with_context(|| format!("Failed to load configuration from {}", options.config_path))?;
    apply_overrides(&mut config, &options);

    config.validate()
        .context("Configuration validation failed")?;

    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config)?;

    if input_path.is_dir() {
        let summary = controller.run_folder(&input_path, &output_path, options.force_overwrite)?;
        if summary.failed > 0 {
            return Err(anyhow!("{} of {} files failed", summary.failed, summary.total()));
        }
    } else if input_path.is_file() {
        // A directory as OUTPUT receives a file named after the input
        let output_file = if output_path.is_dir() {
            FileManager::generate_output_path(
                &input_path,
                &output_path,
                controller.config().output_format.extension(),
            )
        } else {
            output_path
        };

        if controller.run(&input_path, &output_file, options.force_overwrite)?.is_none() {
            info!("Nothing to do for {}", display_name(&input_path));
        }
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", input_path));
    }

    Ok(())
}

// Command line options take precedence over the config file
fn apply_overrides(config: &mut Config, options: &CommandLineOptions) {
    if let Some(min_chars) = options.min_chars {
        config.resegment.min_chars = min_chars;
    }

    if let Some(max_chars) = options.max_chars {
        config.resegment.max_chars = max_chars;
    }

    if let Some(gap_ms) = options.gap_ms {
        config.resegment.gap_ms = gap_ms;
    }

    if let Some(format) = &options.output_format {
        config.output_format = format.clone().into();
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
