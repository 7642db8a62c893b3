use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use tokio::process::Command;

use crate::app_config::{Config, ToolConfig};
use crate::errors::{AppError, Result};
use crate::stream_info::SubtitleStream;
use crate::toolkit::MediaToolkit;

// @module: ffprobe/ffmpeg backed toolkit

/// A fully built external command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub program: String,
    pub args: Vec<String>,
}

impl ToolInvocation {
    fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
        }
    }

    fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    fn path_arg(self, path: &Path) -> Self {
        let arg = path.to_string_lossy().into_owned();
        self.arg(arg)
    }
}

impl fmt::Display for ToolInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " '{}'", arg.replace('\'', r"'\''"))?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Outcome of a transcoder run that did not succeed
#[derive(Debug)]
enum RunError {
    Spawn(String),
    TimedOut(u64),
    Failed(String),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn(msg) => write!(f, "could not start: {}", msg),
            Self::TimedOut(secs) => write!(f, "timed out after {} seconds", secs),
            Self::Failed(msg) => write!(f, "{}", msg),
        }
    }
}

/// `MediaToolkit` spawning the real `ffprobe` and `ffmpeg` executables
#[derive(Debug, Clone)]
pub struct FfmpegToolkit {
    tools: ToolConfig,
    verbose: bool,
    dry_run: bool,
}

impl FfmpegToolkit {
    pub fn new(tools: ToolConfig, verbose: bool, dry_run: bool) -> Self {
        Self {
            tools,
            verbose,
            dry_run,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.tools.clone(), config.verbose, config.dry_run)
    }

    /// `ffprobe -hide_banner ... <input>`
    pub fn probe_invocation(&self, input: &Path) -> ToolInvocation {
        ToolInvocation::new(&self.tools.ffprobe_path)
            .arg("-hide_banner")
            .arg("-analyzeduration")
            .arg(self.tools.analyze_duration.to_string())
            .arg("-probesize")
            .arg(self.tools.probe_size.to_string())
            .path_arg(input)
    }

    // @builds: Common transcoder prefix up to and including the input
    fn transcoder(&self, input: &Path) -> ToolInvocation {
        let mut invocation = ToolInvocation::new(&self.tools.ffmpeg_path);
        if !self.verbose {
            invocation = invocation.arg("-loglevel").arg("warning");
        }
        invocation
            .arg("-nostdin")
            .arg("-hide_banner")
            .arg("-analyzeduration")
            .arg(self.tools.analyze_duration.to_string())
            .arg("-probesize")
            .arg(self.tools.probe_size.to_string())
            .arg("-i")
            .path_arg(input)
    }

    /// Extract one stream as SRT. `-n` makes ffmpeg refuse to overwrite.
    pub fn extract_invocation(&self, input: &Path, stream: &SubtitleStream, output: &Path) -> ToolInvocation {
        self.transcoder(input)
            .arg("-map")
            .arg(stream.index.to_string())
            .arg("-c:s")
            .arg("srt")
            .arg("-n")
            .path_arg(output)
    }

    /// Stream copy of everything but subtitles
    pub fn remux_invocation(&self, input: &Path, output: &Path) -> ToolInvocation {
        self.transcoder(input)
            .arg("-map")
            .arg("0")
            .arg("-c")
            .arg("copy")
            .arg("-sn")
            .arg("-n")
            .path_arg(output)
    }

    // @runs: Transcoder invocation, honouring dry-run and verbosity
    async fn run_transcoder(&self, invocation: ToolInvocation, activity: &str) -> std::result::Result<(), RunError> {
        if self.dry_run {
            info!("[dry-run] {}", invocation);
            return Ok(());
        }
        debug!("Running: {}", invocation);

        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args).stdin(Stdio::null()).kill_on_drop(true);

        let spinner = if self.verbose {
            command.stdout(Stdio::inherit()).stderr(Stdio::inherit());
            None
        } else {
            command.stdout(Stdio::piped()).stderr(Stdio::piped());
            Some(create_spinner(activity))
        };

        let result = with_timeout(self.tools.transcode_timeout_secs, command.output()).await;
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }

        let output = match result {
            Some(Ok(output)) => output,
            Some(Err(e)) => return Err(RunError::Spawn(format!("{}: {}", invocation.program, e))),
            None => return Err(RunError::TimedOut(self.tools.transcode_timeout_secs)),
        };

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail = filter_ffmpeg_stderr(&stderr);
        Err(RunError::Failed(match output.status.code() {
            Some(code) => format!("exit code {}: {}", code, detail),
            None => format!("terminated by signal: {}", detail),
        }))
    }
}

#[async_trait]
impl MediaToolkit for FfmpegToolkit {
    async fn probe(&self, path: &Path) -> Result<String> {
        let invocation = self.probe_invocation(path);
        debug!("Running: {}", invocation);

        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let probe_failure = |message: String, output: String| AppError::ProbeFailure {
            path: path.to_path_buf(),
            message,
            output,
        };

        let output = match with_timeout(self.tools.probe_timeout_secs, command.output()).await {
            Some(Ok(output)) => output,
            Some(Err(e)) => {
                return Err(probe_failure(
                    format!("Failed to execute {}: {}", invocation.program, e),
                    String::new(),
                ));
            }
            None => {
                return Err(probe_failure(
                    format!("{} timed out after {} seconds", invocation.program, self.tools.probe_timeout_secs),
                    String::new(),
                ));
            }
        };

        // The stream description goes to stderr; stdout is normally empty.
        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            return Err(probe_failure(
                format!("{} exited with {}", invocation.program, output.status),
                text,
            ));
        }

        Ok(text)
    }

    async fn extract_stream(&self, input: &Path, stream: &SubtitleStream, output: &Path) -> Result<()> {
        let invocation = self.extract_invocation(input, stream, output);
        self.run_transcoder(invocation, &format!("Extracting stream {}", stream.index))
            .await
            .map_err(|e| AppError::ExtractionFailure {
                stream: stream.index,
                message: e.to_string(),
            })
    }

    async fn remux_without_subtitles(&self, input: &Path, output: &Path) -> Result<()> {
        let invocation = self.remux_invocation(input, output);
        self.run_transcoder(invocation, "Re-muxing without subtitles")
            .await
            .map_err(|e| AppError::RemuxFailure {
                path: PathBuf::from(input),
                message: e.to_string(),
            })
    }
}

// @awaits: Future with an optional limit; None means it timed out
async fn with_timeout<F: std::future::Future>(secs: u64, future: F) -> Option<F::Output> {
    if secs == 0 {
        return Some(future.await);
    }
    tokio::select! {
        result = future => Some(result),
        _ = tokio::time::sleep(Duration::from_secs(secs)) => None,
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg} [{elapsed_precise}]") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// Keep only meaningful ffmpeg error lines, dropping the version banner,
/// build configuration and stream metadata noise.
pub fn filter_ffmpeg_stderr(stderr: &str) -> String {
    const NOISE_PREFIXES: &[&str] = &[
        "ffmpeg version",
        "built with",
        "configuration:",
        "lib",
        "Input #",
        "Metadata:",
        "Duration:",
        "Chapter",
        "Stream #",
        "Output #",
        "Stream mapping:",
        "Press [q]",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !NOISE_PREFIXES.iter().any(|p| line.starts_with(p)))
        .collect();

    if meaningful.is_empty() {
        "no error output from ffmpeg".to_string()
    } else {
        meaningful.join("\n")
    }
}
