// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, warn};
use std::fs::File;
use std::io::BufReader;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app_config::{Config, ScoreProviderKind};
use app_controller::Controller;

mod analysis;
mod app_config;
mod app_controller;
mod errors;
mod media_cutter;
mod providers;
mod report;
mod rescorer;
mod subtitle_processor;
mod timecode;

/// CLI Wrapper for ScoreProviderKind to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliScoreProvider {
    Ollama,
    OpenAI,
}

impl From<CliScoreProvider> for ScoreProviderKind {
    fn from(cli_provider: CliScoreProvider) -> Self {
        match cli_provider {
            CliScoreProvider::Ollama => ScoreProviderKind::Ollama,
            CliScoreProvider::OpenAI => ScoreProviderKind::OpenAI,
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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Select and cut highlight clips from subtitle files (default command)
    #[command(alias = "analyze")]
    Analyze(AnalyzeArgs),

    /// Generate shell completions for plotclip
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct AnalyzeArgs {
    /// Directory containing .srt subtitle files
    #[arg(value_name = "SUBTITLES_DIR")]
    subtitles_dir: PathBuf,

    /// Directory containing the episode video files
    #[arg(short, long)]
    videos_dir: Option<PathBuf>,

    /// Output directory for clips and reports
    #[arg(short, long, default_value = "clips")]
    output_dir: PathBuf,

    /// Analyze and report only, skip cutting
    #[arg(short, long)]
    analyze_only: bool,

    /// Scoring provider to use for AI rescoring
    #[arg(short, long, value_enum)]
    provider: Option<CliScoreProvider>,

    /// Model name to use for AI rescoring
    #[arg(short, long)]
    model: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// plotclip - highlight clip selection for episodic drama
///
/// Scans SRT subtitle files for high-interest plot segments and cuts them
/// out of the episode videos with ffmpeg.
#[derive(Parser, Debug)]
#[command(name = "plotclip")]
#[command(version = "1.0.0")]
#[command(about = "Subtitle-driven highlight clip extraction")]
#[command(long_about = "plotclip scores subtitle windows against plot-point categories, selects the
strongest non-overlapping segments per episode, refines their boundaries to
natural dialogue breaks, and cuts them from the episode videos.

EXAMPLES:
    plotclip ./subtitles -v ./videos            # Analyze and cut clips
    plotclip -a ./subtitles                     # Analyze only, write reports
    plotclip -p ollama -m qwen2 ./subtitles     # Enable a specific rescoring model
    plotclip --log-level debug ./subtitles      # Verbose scan logging
    plotclip completions bash > plotclip.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.

SUPPORTED PROVIDERS:
    ollama - Local Ollama server (default: llama2)
    openai - OpenAI-compatible API (requires API key)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory containing .srt subtitle files
    #[arg(value_name = "SUBTITLES_DIR")]
    subtitles_dir: Option<PathBuf>,

    /// Directory containing the episode video files
    #[arg(short, long)]
    videos_dir: Option<PathBuf>,

    /// Output directory for clips and reports
    #[arg(short, long, default_value = "clips")]
    output_dir: PathBuf,

    /// Analyze and report only, skip cutting
    #[arg(short, long)]
    analyze_only: bool,

    /// Scoring provider to use for AI rescoring
    #[arg(short, long, value_enum)]
    provider: Option<CliScoreProvider>,

    /// Model name to use for AI rescoring
    #[arg(short, long)]
    model: Option<String>,

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

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color code for log level
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
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let emoji = Self::get_emoji_for_level(record.level());
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, emoji, record.args());
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

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "plotclip", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Analyze(args)) => run_analyze(args).await,
        None => {
            // Default behavior - use top-level args
            let subtitles_dir = cli
                .subtitles_dir
                .ok_or_else(|| anyhow!("SUBTITLES_DIR is required when no subcommand is specified"))?;

            let analyze_args = AnalyzeArgs {
                subtitles_dir,
                videos_dir: cli.videos_dir,
                output_dir: cli.output_dir,
                analyze_only: cli.analyze_only,
                provider: cli.provider,
                model: cli.model,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_analyze(analyze_args).await
        }
    }
}

async fn run_analyze(options: AnalyzeArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        log::set_max_level(to_level_filter(&cmd_log_level.clone().into()));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;
        config
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
    if let Some(provider) = &options.provider {
        config.scoring.rescoring.provider = provider.clone().into();
        config.scoring.rescoring.enabled = true;
    }
    if let Some(model) = &options.model {
        config.scoring.rescoring.model = model.clone();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(to_level_filter(&config.log_level));
    }

    let controller = Controller::with_config(config)?;
    controller
        .run(
            options.subtitles_dir,
            options.videos_dir,
            options.output_dir,
            options.analyze_only,
        )
        .await
}

fn to_level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}
