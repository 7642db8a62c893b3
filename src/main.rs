// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{ArgGroup, CommandFactory, Parser, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug, error};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use subscrub::app_config::{Command, Config, LogLevel, ToolConfig};
use subscrub::{AppError, Controller, MediaFile};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

/// subscrub - list, extract, remove and scrub subtitles
///
/// Extracts the text subtitle streams of a media container to scrubbed SRT
/// files, strips subtitle streams from containers, and cleans up existing
/// subtitle files. Needs ffprobe and ffmpeg.
#[derive(Parser, Debug)]
#[command(name = "subscrub")]
#[command(version)]
#[command(about = "Subtitle extraction and cleanup for media containers")]
#[command(disable_help_flag = true)]
#[command(group(ArgGroup::new("operation").args(["list", "extract", "remove", "scrub"]).multiple(false)))]
#[command(after_long_help = "EXAMPLES:
    subscrub --list -i movie.mkv                  # Show subtitle streams
    subscrub --extract -i movie.mkv               # movie.eng.srt, movie.spa.forced.srt, ...
    subscrub --extract -d --create-dir -i movie.mkv
                                                  # Extract into movie/, strip the source
    subscrub --remove -i movie.mkv --output-container mp4
    subscrub --scrub -i movie.eng.srt             # Clean an existing subtitle
    subscrub --dry-run --extract -d -i movie.mkv  # Show what would run

CONFIGURATION:
    Tool paths and probe settings are read from ~/.config/subscrub/config.json
    when present, or from the file given with --config.")]
struct CommandLineOptions {
    /// List the subtitle streams of the input
    #[arg(long)]
    list: bool,

    /// Extract every text subtitle stream to a scrubbed .srt file
    #[arg(long)]
    extract: bool,

    /// Re-mux the input without any subtitle stream
    #[arg(long)]
    remove: bool,

    /// Scrub a text subtitle file in place
    #[arg(long)]
    scrub: bool,

    /// Media or subtitle file to operate on
    #[arg(short, long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Echo raw prober output and show transcoder output
    #[arg(short, long)]
    verbose: bool,

    /// Container extension for re-muxed output (default: the input's)
    #[arg(long, value_name = "EXT")]
    output_container: Option<String>,

    /// After extracting, strip the subtitles from the source
    #[arg(short = 'd', long, requires = "extract")]
    remove_after_extract: bool,

    /// Put the outputs (and the source) in a directory named after the input
    #[arg(long, requires = "extract")]
    create_dir: bool,

    /// Print the tool invocations without running them or touching files
    #[arg(long)]
    dry_run: bool,

    /// Configuration file path
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Print a shell completion script and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<Shell>,

    /// Print help
    #[arg(short, long)]
    help: bool,
}

impl CommandLineOptions {
    // @returns: The selected command, if exactly one was given
    fn selected_command(&self) -> Option<Command> {
        if self.list {
            Some(Command::List)
        } else if self.extract {
            Some(Command::Extract)
        } else if self.remove {
            Some(Command::Remove)
        } else if self.scrub {
            Some(Command::Scrub)
        } else {
            None
        }
    }
}

// @struct: Custom logger implementation
// The level is read from log::max_level() so it can be raised after the
// configuration is loaded.
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour and tag for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (colour, tag) = Self::style_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", colour, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    if let Err(e) = CustomLogger::init(LevelFilter::Info) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let cli = match CommandLineOptions::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.kind() == ErrorKind::DisplayVersion => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            // Usage errors exit with 1, not clap's default of 2
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };

    if cli.help {
        let _ = CommandLineOptions::command().print_long_help();
        return ExitCode::FAILURE;
    }

    if let Some(shell) = cli.completions {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "subscrub", &mut std::io::stdout());
        return ExitCode::SUCCESS;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            if let Some(app_error) = e.downcast_ref::<AppError>() {
                if let AppError::Usage(_) = app_error {
                    eprintln!("\n{}", CommandLineOptions::command().render_usage());
                }
                if let Some(output) = app_error.tool_output() {
                    eprintln!("{}", output.trim_end());
                }
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(options: CommandLineOptions) -> Result<()> {
    let command = options.selected_command().ok_or_else(|| {
        AppError::Usage("choose one of --list, --extract, --remove or --scrub".to_string())
    })?;
    let input = options
        .input
        .as_ref()
        .ok_or_else(|| AppError::Usage("an input file is required (-i/--input)".to_string()))?;

    let tools = ToolConfig::load(options.config.as_deref()).context("Failed to load configuration")?;

    // Command line level wins, then --verbose, then the config file
    let log_level = match (&options.log_level, options.verbose, tools.log_level) {
        (Some(level), _, _) => LogLevel::from(level.clone()),
        (None, true, _) => LogLevel::Debug,
        (None, false, Some(level)) => level,
        (None, false, None) => LogLevel::Info,
    };
    log::set_max_level(log_level.into());

    let input = MediaFile::resolve(input)?;

    let config = Config {
        command,
        input,
        verbose: options.verbose,
        dry_run: options.dry_run,
        output_container: options.output_container.clone(),
        remove_after_extract: options.remove_after_extract,
        create_dir: options.create_dir,
        tools,
    };
    config.validate()?;
    debug!("Configuration: {:?}", config);

    Controller::with_config(config).run().await?;
    Ok(())
}
