// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use srt_translator::app_config::{self, Config};
use srt_translator::app_controller::Controller;
use srt_translator::providers::ProviderRegistry;

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
    /// Translate subtitle files (default command)
    Translate(TranslateArgs),

    /// List the available translation providers
    Providers,

    /// Generate shell completions for srt-translator
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(clap::Args, Debug)]
struct TranslateArgs {
    /// Input .srt file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Output file (or directory when the input is a directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Translation provider to use (see `providers`)
    #[arg(short, long)]
    provider: Option<String>,

    /// Model name for LLM providers
    #[arg(short, long)]
    model: Option<String>,

    /// Source language code (e.g., 'en', 'es', 'fr'); detected when omitted
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'en', 'es', 'zh-Hans')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Number of entries sent per provider call
    #[arg(short, long)]
    batch_size: Option<usize>,

    /// Send each batch to LLM providers as a single prompt
    #[arg(long)]
    merge: bool,

    /// Fail on malformed subtitle blocks instead of skipping them
    #[arg(long)]
    strict: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// srt-translator - translate SRT subtitle files through pluggable providers
#[derive(Parser, Debug)]
#[command(name = "srt-translator")]
#[command(version)]
#[command(about = "Translate SRT subtitle files with machine translation providers")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "srt-translator parses SRT subtitles, translates their text in batches through a
selectable provider and writes the result with the original timing.

EXAMPLES:
    srt-translator movie.srt                          # Translate using default config
    srt-translator -f movie.srt                       # Force overwrite existing output
    srt-translator -p openai -m gpt-4o movie.srt      # Use specific provider and model
    srt-translator -s en -t es movie.srt              # Translate from English to Spanish
    srt-translator -o out.srt -b 20 movie.srt         # Explicit output, 20 entries per call
    srt-translator --log-level debug /subtitles/      # Process a directory with debug logging
    srt-translator providers                          # List provider names
    srt-translator completions bash > srt.bash        # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically. API keys left empty in the config are read from
    <PROVIDER>_API_KEY (for example OPENAI_API_KEY).

SUPPORTED PROVIDERS:
    google    - Google Cloud Translation v2
    bing      - Microsoft Azure Translator v3 (region via config)
    yandex    - Yandex Cloud Translate v2 (folder_id via config extra)
    openai    - OpenAI chat completions (default: gpt-3.5-turbo)
    gemini    - Google Gemini (default: gemini-2.0-flash)
    deepseek  - DeepSeek chat completions (default: deepseek-chat)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    translate: TranslateArgs,
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

    // @returns: ANSI color and emoji for a log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "❌ "),
            Level::Warn => ("\x1B[1;33m", "🚧 "),
            Level::Info => ("\x1B[1;32m", " "),
            Level::Debug => ("\x1B[1;36m", "🔍 "),
            Level::Trace => ("\x1B[1;35m", "📋 "),
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
            let (color, emoji) = Self::style_for_level(record.level());
            let _ = writeln!(std::io::stderr(), "{}{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Installed at the most verbose level; `log::set_max_level` narrows it later
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "srt-translator", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Providers) => {
            for name in ProviderRegistry::with_builtin_providers().available() {
                println!("{}", name);
            }
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => run_translate(cli.translate).await,
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    let input_path = options
        .input_path
        .clone()
        .ok_or_else(|| anyhow!("INPUT_PATH is required when no subcommand is specified"))?;

    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let controller = Controller::from_config_file(
        Path::new(&options.config_path),
        ProviderRegistry::with_builtin_providers(),
        |config| apply_overrides(config, &options),
    )?;

    if options.log_level.is_none() {
        log::set_max_level(controller.config().log_level.to_level_filter());
    }

    let summary = controller
        .run(input_path, options.output.clone(), options.force_overwrite)
        .await?;

    info!(
        "Done: {} translated, {} skipped, {} failed",
        summary.translated, summary.skipped, summary.failed
    );

    if summary.failed > 0 {
        return Err(anyhow!("{} file(s) could not be translated", summary.failed));
    }
    Ok(())
}

/// Apply command line settings on top of the configuration file
fn apply_overrides(config: &mut Config, options: &TranslateArgs) {
    if let Some(provider) = &options.provider {
        config.provider = provider.clone();
    }

    if let Some(source_language) = &options.source_language {
        config.source_language = Some(source_language.clone());
    }

    if let Some(target_language) = &options.target_language {
        config.target_language = target_language.clone();
    }

    if let Some(batch_size) = options.batch_size {
        config.batch_size = batch_size;
    }

    if options.strict {
        config.skip_malformed_blocks = false;
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    let active = config.provider.clone();
    if let Some(model) = &options.model {
        config.provider_config_mut(&active).model = Some(model.clone());
    }
    if options.merge {
        config.provider_config_mut(&active).merge = true;
    }
}
