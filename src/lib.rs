/*!
 * # subscrub - subtitle extraction and cleanup for media containers
 *
 * A thin layer over `ffprobe` and `ffmpeg` that lists, extracts and removes
 * embedded subtitle streams, and scrubs text subtitles of hearing-impaired
 * cues and formatting leftovers.
 *
 * ## Features
 *
 * - List the subtitle streams of a container
 * - Extract every text subtitle stream to `{name}.{lang}.srt`, scrubbed
 * - Re-mux a container without its subtitle streams
 * - Scrub an existing `.srt` file in place
 * - Dry-run mode that prints every tool invocation without running it
 *
 * ## Architecture
 *
 * - `app_config`: Invocation context and tool configuration
 * - `app_controller`: Orchestration of the list/extract/remove/scrub commands
 * - `media_file`: Names derived from the input path
 * - `stream_info`: Parsing of the prober's stream description
 * - `scrub`: Ordered text substitution rules
 * - `toolkit`: The `MediaToolkit` seam over ffprobe/ffmpeg, plus a mock
 * - `file_utils`: File system operations and output naming
 * - `language_utils`: ISO language code utilities
 * - `errors`: Error type shared by every module
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod media_file;
pub mod scrub;
pub mod stream_info;
pub mod toolkit;

// Re-export main types for easier usage
pub use app_config::{Command, Config, ToolConfig};
pub use app_controller::{Controller, ExtractionReport};
pub use errors::AppError;
pub use media_file::MediaFile;
pub use stream_info::{StreamIndex, StreamListing, SubtitleStream, parse_stream_info};
pub use toolkit::{FfmpegToolkit, MediaToolkit, MockToolkit};
