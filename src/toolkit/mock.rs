/*!
 * In-memory toolkit for tests.
 *
 * `MockToolkit` answers probes with canned prober output and fakes the
 * transcoder by writing files, so the orchestrators can be exercised end to
 * end against a temporary directory:
 * - `extract_stream` writes the configured subtitle text to the output path
 * - `remux_without_subtitles` copies the input to the output path
 *
 * In dry-run mode calls are only recorded.
 */

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::errors::{AppError, Result};
use crate::stream_info::{StreamIndex, SubtitleStream};
use crate::toolkit::MediaToolkit;

/// One recorded toolkit call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    Probe(PathBuf),
    Extract {
        input: PathBuf,
        stream: StreamIndex,
        output: PathBuf,
    },
    Remux {
        input: PathBuf,
        output: PathBuf,
    },
}

/// Scripted `MediaToolkit`
#[derive(Debug, Clone, Default)]
pub struct MockToolkit {
    probe_output: String,
    probe_fails: bool,
    subtitle_text: String,
    fail_extract_of: Option<StreamIndex>,
    fail_remux: bool,
    dry_run: bool,
    calls: Arc<Mutex<Vec<ToolCall>>>,
}

impl MockToolkit {
    /// Toolkit whose prober prints `probe_output`
    pub fn with_probe_output(probe_output: &str) -> Self {
        Self {
            probe_output: probe_output.to_string(),
            subtitle_text: "1\n00:00:01,000 --> 00:00:02,000\nHello.\n".to_string(),
            ..Self::default()
        }
    }

    /// Make the prober exit with an error
    pub fn failing_probe(mut self) -> Self {
        self.probe_fails = true;
        self
    }

    /// Text written for every extracted stream
    pub fn with_subtitle_text(mut self, text: &str) -> Self {
        self.subtitle_text = text.to_string();
        self
    }

    /// Make extraction of one stream fail
    pub fn failing_extract(mut self, stream: StreamIndex) -> Self {
        self.fail_extract_of = Some(stream);
        self
    }

    /// Make the re-mux fail after writing a partial output
    pub fn failing_remux(mut self) -> Self {
        self.fail_remux = true;
        self
    }

    /// Record calls without writing any file, like a dry-run transcoder
    pub fn in_dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Calls made so far, in order
    pub fn calls(&self) -> Vec<ToolCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: ToolCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

#[async_trait]
impl MediaToolkit for MockToolkit {
    async fn probe(&self, path: &Path) -> Result<String> {
        self.record(ToolCall::Probe(path.to_path_buf()));
        if self.probe_fails {
            return Err(AppError::ProbeFailure {
                path: path.to_path_buf(),
                message: "mock prober failed".to_string(),
                output: self.probe_output.clone(),
            });
        }
        Ok(self.probe_output.clone())
    }

    async fn extract_stream(&self, input: &Path, stream: &SubtitleStream, output: &Path) -> Result<()> {
        self.record(ToolCall::Extract {
            input: input.to_path_buf(),
            stream: stream.index,
            output: output.to_path_buf(),
        });
        if self.fail_extract_of == Some(stream.index) {
            return Err(AppError::ExtractionFailure {
                stream: stream.index,
                message: "mock transcoder failed".to_string(),
            });
        }
        if !self.dry_run {
            fs::write(output, &self.subtitle_text)?;
        }
        Ok(())
    }

    async fn remux_without_subtitles(&self, input: &Path, output: &Path) -> Result<()> {
        self.record(ToolCall::Remux {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
        });
        if self.fail_remux {
            fs::write(output, b"partial")?;
            return Err(AppError::RemuxFailure {
                path: input.to_path_buf(),
                message: "mock transcoder failed".to_string(),
            });
        }
        if !self.dry_run {
            fs::copy(input, output)?;
        }
        Ok(())
    }
}
