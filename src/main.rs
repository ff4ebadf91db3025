// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug, info};
use std::io::Write;
use std::path::PathBuf;

use paratrans::app_config::{self, Config};
use paratrans::app_controller::Controller;

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
    /// Translate a file, folder or URL (default command)
    Translate(TranslateArgs),

    /// Generate shell completions for paratrans
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
struct TranslateArgs {
    /// Input file, folder or URL to translate
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<String>,

    /// API key for the completion service
    #[arg(short = 'k', long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Number of paragraphs translated concurrently
    #[arg(short, long)]
    workers: Option<usize>,

    /// Write the source paragraph above each translation
    #[arg(short, long)]
    bilingual: bool,

    /// Target language name (e.g. 'Spanish', 'German')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Do not translate people's and authors' names
    #[arg(long)]
    preserve_names: bool,

    /// Keep the trailing references section untranslated
    #[arg(long)]
    exclude_references: bool,

    /// Repeat the first two paragraphs untranslated above the translation
    #[arg(long)]
    keep_leading_paragraphs: bool,

    /// Only process files with this extension when translating a folder
    #[arg(short, long)]
    extension: Option<String>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Base URL of the chat-completions API
    #[arg(long)]
    endpoint: Option<String>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// paratrans - paragraph-level document translation
///
/// Translates text, markdown, rich text and HTML documents (files, folders
/// or URLs) through an OpenAI-compatible chat-completions API.
#[derive(Parser, Debug)]
#[command(name = "paratrans")]
#[command(version)]
#[command(about = "Paragraph-level document translation with LLMs")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "paratrans splits documents into paragraphs and translates them concurrently through an LLM.

EXAMPLES:
    paratrans paper.txt -k sk-...                     # Translate into Spanish
    paratrans -t German -b paper.md                   # Bilingual German output
    paratrans --exclude-references paper.txt          # Leave references untranslated
    paratrans -e md -w 4 ./papers/                    # Translate every .md file in a folder
    paratrans https://example.com/article.html        # Download and translate a web page
    paratrans completions bash > paratrans.bash       # Generate bash completions

CONFIGURATION:
    Settings can be kept in a JSON file passed with --config. Command line
    flags override file values. The API key may also come from OPENAI_API_KEY.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    args: TranslateArgs,
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
        // The logger itself accepts everything; the global max level filters
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Marker for log level
    fn get_marker_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "✖",
            Level::Warn => "!",
            Level::Info => " ",
            Level::Debug => "·",
            Level::Trace => "…",
        }
    }

    // @returns: ANSI colour for log level
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
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(record.level()),
                now,
                Self::get_marker_for_level(record.level()),
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
            generate(shell, &mut cmd, "paratrans", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => run_translate(cli.args).await,
    }
}

/// Build the effective configuration: file (or defaults), then CLI overrides
fn build_config(options: &TranslateArgs) -> Result<Config> {
    let mut config = match &options.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if let Some(api_key) = &options.api_key {
        config.translation.api_key = api_key.clone();
    }
    if let Some(workers) = options.workers {
        config.translation.concurrent_requests = workers;
    }
    if let Some(model) = &options.model {
        config.translation.model = model.clone();
    }
    if let Some(endpoint) = &options.endpoint {
        config.translation.endpoint = endpoint.clone();
    }
    if let Some(target_language) = &options.target_language {
        config.target_language = target_language.clone();
    }
    if let Some(extension) = &options.extension {
        config.document.extension_filter = Some(extension.clone());
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Switches only ever turn options on
    config.document.bilingual |= options.bilingual;
    config.document.preserve_names |= options.preserve_names;
    config.document.exclude_references |= options.exclude_references;
    config.document.keep_leading_paragraphs |= options.keep_leading_paragraphs;

    Ok(config)
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let input = options
        .input_path
        .clone()
        .ok_or_else(|| anyhow!("INPUT_PATH is required when no subcommand is specified"))?;

    let config = build_config(&options)?;
    log::set_max_level(config.log_level.to_level_filter());

    // Validate the configuration after loading and overriding
    config
        .validate()
        .context("Configuration validation failed")?;

    debug!(
        "Model {} at {}, {} workers",
        config.translation.model, config.translation.endpoint, config.translation.concurrent_requests
    );
    info!("Target language: {}", config.target_language);

    let controller = Controller::new(config)?;
    controller.run(&input).await
}
