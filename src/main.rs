// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
// Add other lints specific to this module that you want to allow but not auto-fix

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use paratrans::app_config::{self, Config};
use paratrans::app_controller::Controller;
use paratrans::errors::AppError;
use paratrans::translation::RunControl;

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
    /// Generate shell completions for paratrans
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// paratrans - line-aligned bulk translation of text files
#[derive(Parser, Debug)]
#[command(name = "paratrans")]
#[command(version)]
#[command(about = "Line-aligned translation of text files through a web translation endpoint")]
#[command(long_about = "paratrans translates a text file line by line with concurrent requests and
writes a CSV of every translated row, a text file aligned line-for-line with
the input, and a gettext catalog.

EXAMPLES:
    paratrans --input book.txt --from en --to fr --output out/
    paratrans --input book.txt --from auto --to de --output out/ --interactive
    paratrans completions bash > paratrans.bash

INTERACTIVE MODE:
    Type p + Enter to pause, r + Enter to resume, c + Enter to cancel.
    Ctrl-C cancels in every mode; rows already translated are kept.

CONFIGURATION:
    Settings are read from conf.json when it exists (see --config).
    Command-line flags override file values.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Text file to translate
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Source language code (e.g., 'en', 'auto')
    #[arg(short, long)]
    from: Option<String>,

    /// Target language code (e.g., 'fr', 'zh-CN')
    #[arg(short, long)]
    to: Option<String>,

    /// Folder to store translated files
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Maximum concurrent requests
    #[arg(long)]
    concurrency: Option<usize>,

    /// Read pause/resume/cancel commands from stdin
    #[arg(long)]
    interactive: bool,

    /// Do not retranslate each sentence into extra columns
    #[arg(long)]
    no_sentences: bool,

    /// Add per-word vocabulary columns
    #[arg(long)]
    vocabulary: bool,

    /// Keep alternate translations as extra columns
    #[arg(long)]
    alternates: bool,
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

    // @returns: ANSI colour for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
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
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                Self::get_emoji_for_level(record.level()),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() {
    // Logger starts permissive; the level is narrowed once the config is known
    if let Err(e) = CustomLogger::init(LevelFilter::Trace) {
        eprintln!("Failed to initialize logger: {}", e);
    }
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "paratrans", &mut std::io::stdout());
        return;
    }

    if let Err(e) = run_translate(cli).await {
        error!("{}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run_translate(options: CommandLineOptions) -> Result<(), AppError> {
    let input = options
        .input
        .clone()
        .ok_or_else(|| AppError::Config("missing required input file path (--input)".to_string()))?;
    let output = options
        .output
        .clone()
        .ok_or_else(|| AppError::Config("missing required output folder path (--output)".to_string()))?;

    let config = load_config(&options).map_err(|e| AppError::Config(format!("{:#}", e)))?;
    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config)
        .map_err(|e| AppError::Config(format!("{:#}", e)))?
        .interactive(options.interactive);

    let control = RunControl::new();
    spawn_ctrl_c_handler(control.clone());
    if options.interactive {
        spawn_stdin_commands(control.clone());
    }

    let report = controller.run_with_control(&input, &output, control).await?;
    if report.summary.cancelled {
        warn!("Output is partial: {}", report.paths.aligned_text.display());
    }

    Ok(())
}

// @loads: Config file (when present) with CLI overrides applied
fn load_config(options: &CommandLineOptions) -> Result<Config> {
    let mut config = Config::load_or_default(&options.config)?;

    if let Some(from) = &options.from {
        config.source_language = from.clone();
    }
    if let Some(to) = &options.to {
        config.target_language = to.clone();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
    if let Some(concurrency) = options.concurrency {
        config.dispatch.concurrent_requests = concurrency;
    }
    if options.no_sentences {
        config.output.retranslate_sentences = false;
    }
    if options.vocabulary {
        config.output.vocabulary = true;
    }
    if options.alternates {
        config.output.include_alternates = true;
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

fn spawn_ctrl_c_handler(control: RunControl) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, finishing in-flight lines");
            control.cancel();
        }
    });
}

// Blocking stdin reads run off the runtime
fn spawn_stdin_commands(control: RunControl) {
    info!("Interactive mode: p = pause, r = resume, c = cancel");
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match line.trim() {
                "p" => {
                    control.pause();
                }
                "r" => {
                    control.resume();
                }
                "c" => {
                    control.cancel();
                    break;
                }
                "" => {}
                other => warn!("Unknown command '{}' (p, r or c)", other),
            }
        }
    });
}
