/*!
 * External media tools.
 *
 * The pipeline never decodes media itself. Everything it needs from the
 * prober and the transcoder goes through the `MediaToolkit` trait:
 * - `ffmpeg`: the real implementation, spawning `ffprobe` and `ffmpeg`
 * - `mock`: an in-memory implementation that records calls, for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::path::Path;

use crate::errors::Result;
use crate::stream_info::SubtitleStream;

/// Narrow interface to the prober and the transcoder
#[async_trait]
pub trait MediaToolkit: Send + Sync + Debug {
    /// Run the prober on `path` and return its raw text output
    ///
    /// # Returns
    /// * `Result<String>` - the stream description, or `ProbeFailure`
    async fn probe(&self, path: &Path) -> Result<String>;

    /// Write a single subtitle stream of `input` to the text subtitle `output`
    ///
    /// # Returns
    /// * `Result<()>` - Ok once `output` is written, or `ExtractionFailure`
    async fn extract_stream(&self, input: &Path, stream: &SubtitleStream, output: &Path) -> Result<()>;

    /// Copy every stream of `input` except subtitles into `output`
    ///
    /// # Returns
    /// * `Result<()>` - Ok once `output` is written, or `RemuxFailure`
    async fn remux_without_subtitles(&self, input: &Path, output: &Path) -> Result<()>;
}

pub mod ffmpeg;
pub mod mock;

pub use ffmpeg::FfmpegToolkit;
pub use mock::MockToolkit;
