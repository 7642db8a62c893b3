/*!
 * Application configuration.
 *
 * `ToolConfig` is the optional JSON file describing how the external tools
 * are invoked. `Config` is the immutable invocation context built once by
 * `main` from the command line and the file, then handed to the controller.
 */

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::errors::{AppError, Result};
use crate::media_file::MediaFile;

/// Operation selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    List,
    Extract,
    Remove,
    Scrub,
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::List => "list",
            Self::Extract => "extract",
            Self::Remove => "remove",
            Self::Scrub => "scrub",
        };
        write!(f, "{}", name)
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// External tool settings, loadable from `config.json`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ToolConfig {
    // @field: Transcoder executable
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,

    // @field: Prober executable
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: String,

    /// Microseconds of input analyzed when probing. Subtitle streams that
    /// start late in a file are only found with a large window.
    #[serde(default = "default_analyze_window")]
    pub analyze_duration: u64,

    /// Bytes of input analyzed when probing
    #[serde(default = "default_analyze_window")]
    pub probe_size: u64,

    // @field: Prober timeout, seconds
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,

    /// Transcoder timeout in seconds, 0 disables it
    #[serde(default)]
    pub transcode_timeout_secs: u64,

    // @field: Log level used when none is given on the command line
    #[serde(default)]
    pub log_level: Option<LogLevel>,
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe_path() -> String {
    "ffprobe".to_string()
}

fn default_analyze_window() -> u64 {
    100_000_000
}

fn default_probe_timeout_secs() -> u64 {
    60
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            ffprobe_path: default_ffprobe_path(),
            analyze_duration: default_analyze_window(),
            probe_size: default_analyze_window(),
            probe_timeout_secs: default_probe_timeout_secs(),
            transcode_timeout_secs: 0,
            log_level: None,
        }
    }
}

impl ToolConfig {
    /// Default location: `{config_dir}/subscrub/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("subscrub").join("config.json"))
    }

    /// Load the tool configuration.
    ///
    /// An explicitly given path must exist. The default location is optional
    /// and falls back to built-in defaults. Nothing is ever written.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let config = match explicit_path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        config.validate()?;
        Ok(config)
    }

    // @reads: JSON config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            AppError::Config(format!("Failed to open config file {}: {}", path.display(), e))
        })?;

        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {}: {}", path.display(), e))
        })
    }

    /// Validate the tool settings
    pub fn validate(&self) -> Result<()> {
        if self.ffmpeg_path.trim().is_empty() {
            return Err(AppError::Config("ffmpeg_path must not be empty".to_string()));
        }
        if self.ffprobe_path.trim().is_empty() {
            return Err(AppError::Config("ffprobe_path must not be empty".to_string()));
        }
        if self.analyze_duration == 0 {
            return Err(AppError::Config("analyze_duration must be positive".to_string()));
        }
        // ffmpeg rejects probe sizes below 32 bytes
        if self.probe_size < 32 {
            return Err(AppError::Config("probe_size must be at least 32".to_string()));
        }
        if self.probe_timeout_secs == 0 {
            return Err(AppError::Config("probe_timeout_secs must be positive".to_string()));
        }
        Ok(())
    }
}

/// Invocation context passed to every orchestrator
#[derive(Debug, Clone)]
pub struct Config {
    pub command: Command,

    pub input: MediaFile,

    /// Echo raw prober output and let the transcoder talk
    pub verbose: bool,

    /// Print tool invocations instead of running them, touch no files
    pub dry_run: bool,

    /// Container for re-muxed output, defaults to the input's extension
    pub output_container: Option<String>,

    pub remove_after_extract: bool,

    pub create_dir: bool,

    pub tools: ToolConfig,
}

impl Config {
    /// Context with every option off
    pub fn new(command: Command, input: MediaFile) -> Self {
        Self {
            command,
            input,
            verbose: false,
            dry_run: false,
            output_container: None,
            remove_after_extract: false,
            create_dir: false,
            tools: ToolConfig::default(),
        }
    }

    /// Container extension used for re-muxed output
    pub fn output_container(&self) -> String {
        self.output_container
            .as_deref()
            .map(|c| c.trim_start_matches('.').to_lowercase())
            .unwrap_or_else(|| self.input.extension.clone())
    }

    /// True when the re-muxed file changes container
    pub fn container_change(&self) -> bool {
        !self.output_container().eq_ignore_ascii_case(&self.input.extension)
    }

    /// True when the command writes a re-muxed container
    pub fn remuxes(&self) -> bool {
        match self.command {
            Command::Remove => true,
            Command::Extract => self.remove_after_extract,
            Command::List | Command::Scrub => false,
        }
    }

    /// Check option combinations that clap cannot express
    pub fn validate(&self) -> Result<()> {
        if let Some(container) = &self.output_container {
            let container = container.trim_start_matches('.');
            if container.is_empty() || !container.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(AppError::Usage(format!(
                    "Invalid output container: '{}'",
                    container
                )));
            }
        }

        if self.remuxes() && self.output_container().is_empty() {
            return Err(AppError::Usage(format!(
                "{} has no extension, specify --output-container",
                self.input.file_name
            )));
        }

        if self.command != Command::Extract && (self.remove_after_extract || self.create_dir) {
            return Err(AppError::Usage(
                "--remove-after-extract and --create-dir only apply to --extract".to_string(),
            ));
        }

        self.tools.validate()
    }
}
