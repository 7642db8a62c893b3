/*!
 * Error types for the subscrub application.
 *
 * Every fatal condition the pipeline can hit has its own variant so callers
 * (and tests) can tell a usage problem from a failing external tool. All of
 * them end the process with exit code 1.
 */

use std::path::PathBuf;

use thiserror::Error;

use crate::stream_info::StreamIndex;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Bad or missing command line arguments
    #[error("Usage error: {0}")]
    Usage(String),

    /// Input path is missing or is not a regular file
    #[error("Input file not found or not a regular file: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The prober could not be run, timed out or exited with an error
    #[error("Failed to probe {}: {message}", .path.display())]
    ProbeFailure {
        /// File that was probed
        path: PathBuf,
        /// Short description of what went wrong
        message: String,
        /// Raw prober output, kept for diagnosis
        output: String,
    },

    /// At least one subtitle stream could not be identified
    #[error("Could not resolve the stream index of {} subtitle line(s):\n{}", .lines.len(), .lines.join("\n"))]
    ParseAmbiguity {
        /// The offending prober lines
        lines: Vec<String>,
    },

    /// The container holds no subtitle streams
    #[error("No subtitle streams found in {}", .0.display())]
    NoSubtitles(PathBuf),

    /// The transcoder failed while extracting a single stream
    #[error("Failed to extract subtitle stream {stream}: {message}")]
    ExtractionFailure {
        /// Stream that failed
        stream: StreamIndex,
        /// Filtered transcoder output
        message: String,
    },

    /// The transcoder failed while re-muxing the container
    #[error("Failed to re-mux {}: {message}", .path.display())]
    RemuxFailure {
        /// Source container
        path: PathBuf,
        /// Filtered transcoder output
        message: String,
    },

    /// A file the pipeline needs to create is already there
    #[error("Output file already exists: {}", .0.display())]
    OutputExists(PathBuf),

    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Raw tool output attached to the error, if any
    pub fn tool_output(&self) -> Option<&str> {
        match self {
            Self::ProbeFailure { output, .. } if !output.trim().is_empty() => Some(output),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, AppError>;
