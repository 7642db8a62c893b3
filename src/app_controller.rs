use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use crate::app_config::{Command, Config};
use crate::errors::{AppError, Result};
use crate::file_utils::{FileManager, format_bytes};
use crate::language_utils;
use crate::scrub;
use crate::stream_info::{self, StreamListing, SubtitleStream};
use crate::toolkit::{FfmpegToolkit, MediaToolkit};

// @module: Application controller for the subtitle pipeline

/// What an extraction produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    /// Subtitle files written, in stream order
    pub extracted: Vec<PathBuf>,

    /// Image-based streams that were left alone
    pub skipped: Vec<SubtitleStream>,

    /// Where the media file ended up, if it was moved or re-muxed
    pub media_path: Option<PathBuf>,
}

/// Main application controller
///
/// Holds the immutable invocation context and the toolkit used to reach the
/// external tools. Each public operation runs one command start to finish.
#[derive(Debug)]
pub struct Controller {
    // @field: Invocation context
    config: Config,

    // @field: Prober/transcoder access
    toolkit: Box<dyn MediaToolkit>,
}

impl Controller {
    // @method: Controller using the real ffprobe/ffmpeg
    pub fn with_config(config: Config) -> Self {
        let toolkit = FfmpegToolkit::from_config(&config);
        Self::new(config, Box::new(toolkit))
    }

    pub fn new(config: Config, toolkit: Box<dyn MediaToolkit>) -> Self {
        Self { config, toolkit }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the command selected in the configuration
    pub async fn run(&self) -> Result<()> {
        debug!("Running {} on {}", self.config.command, self.config.input.path.display());
        match self.config.command {
            Command::List => self.list().await.map(|_| ()),
            Command::Extract => self.extract().await.map(|_| ()),
            Command::Remove => self.remove().await.map(|_| ()),
            Command::Scrub => self.scrub().map(|_| ()),
        }
    }

    /// Probe the input and parse its subtitle streams
    pub async fn probe_streams(&self) -> Result<StreamListing> {
        let raw = self.toolkit.probe(&self.config.input.path).await?;
        if self.config.verbose {
            eprintln!("{}", raw.trim_end());
        }

        let listing = stream_info::parse_stream_info(&raw)?;
        debug!(
            "Found {} text and {} image-based subtitle stream(s)",
            listing.text.len(),
            listing.image_based.len()
        );
        Ok(listing)
    }

    /// Print the subtitle streams of the input
    pub async fn list(&self) -> Result<StreamListing> {
        let listing = self.probe_streams().await?;
        let media = &self.config.input;

        if listing.is_empty() {
            println!("No subtitle streams in {}", media.file_name);
            return Ok(listing);
        }

        if !listing.text.is_empty() {
            println!("Subtitle streams in {}:", media.file_name);
            for stream in &listing.text {
                println!("   {}", describe_stream(stream));
            }
        }
        if !listing.image_based.is_empty() {
            println!("Image-based subtitle streams (skipped on extract):");
            for stream in &listing.image_based {
                println!("   {}", describe_stream(stream));
            }
        }
        Ok(listing)
    }

    /// Extract every text subtitle stream to its own scrubbed `.srt` file
    pub async fn extract(&self) -> Result<ExtractionReport> {
        let media = &self.config.input;
        let listing = self.probe_streams().await?;
        let output_dir = if self.config.create_dir {
            media.named_directory()
        } else {
            media.directory.clone()
        };

        let mut report = ExtractionReport {
            skipped: listing.image_based.clone(),
            ..ExtractionReport::default()
        };
        for stream in &listing.image_based {
            warn!("Image-based subtitle stream {}, skipped", describe_stream(stream));
        }

        if listing.is_empty() {
            warn!("No subtitles in {}", media.file_name);
            if !self.config.create_dir {
                return Err(AppError::NoSubtitles(media.path.clone()));
            }
            report.media_path = Some(self.move_into(&output_dir)?);
            return Ok(report);
        }

        if listing.text.is_empty() {
            warn!("Only image-based subtitles in {}, nothing to extract", media.file_name);
            if self.config.remove_after_extract {
                warn!("Keeping the subtitle streams of {}, none could be extracted", media.file_name);
            }
            if self.config.create_dir {
                report.media_path = Some(self.move_into(&output_dir)?);
            }
            return Ok(report);
        }

        if self.config.create_dir {
            self.fs_step(format!("create directory {}", output_dir.display()), || {
                FileManager::ensure_dir(&output_dir)
            })?;
        }

        for stream in &listing.text {
            let output = FileManager::next_available_output_path(
                &output_dir,
                &media.stem,
                &stream.language_tag(),
                "srt",
                &report.extracted,
            );
            info!("Extracting subtitle {} -> {}", describe_stream(stream), output.display());
            self.toolkit.extract_stream(&media.path, stream, &output).await?;

            self.fs_step(format!("scrub {}", output.display()), || {
                scrub::scrub_file(&output).map(|_| ())
            })?;
            report.extracted.push(output);
        }
        info!("Extracted {} subtitle file(s)", report.extracted.len());

        if self.config.remove_after_extract {
            report.media_path = Some(self.strip_after_extract(&output_dir).await?);
        } else if self.config.create_dir {
            report.media_path = Some(self.move_into(&output_dir)?);
        }

        Ok(report)
    }

    /// Re-mux the input without any subtitle stream, replacing it
    pub async fn remove(&self) -> Result<PathBuf> {
        let media = &self.config.input;
        let listing = self.probe_streams().await?;
        if listing.is_empty() {
            return Err(AppError::NoSubtitles(media.path.clone()));
        }

        let container = self.config.output_container();
        let working = media.working_path(&container);
        let destination = media.path_with_container(&media.directory, &container);
        if working.exists() {
            return Err(AppError::OutputExists(working));
        }
        if self.config.container_change() && destination.exists() {
            return Err(AppError::OutputExists(destination));
        }

        info!("Removing {} subtitle stream(s) from {}", listing.len(), media.file_name);
        if let Err(e) = self.toolkit.remux_without_subtitles(&media.path, &working).await {
            discard_partial(&working);
            return Err(e);
        }

        let original_size = self.size_of(&media.path);
        self.fs_step(format!("delete {}", media.path.display()), || {
            FileManager::remove_file(&media.path)
        })?;
        self.fs_step(
            format!("move {} -> {}", working.display(), destination.display()),
            || FileManager::rename_file(&working, &destination),
        )?;
        self.report_sizes(original_size, &destination);

        Ok(destination)
    }

    /// Scrub the input subtitle file in place
    pub fn scrub(&self) -> Result<bool> {
        let path = &self.config.input.path;
        if self.config.dry_run {
            let content = FileManager::read_to_string(path)?;
            let changed = scrub::scrub_text(&content) != content;
            info!("[dry-run] {} would {}change", path.display(), if changed { "" } else { "not " });
            return Ok(changed);
        }

        let changed = scrub::scrub_file(path)?;
        if changed {
            info!("Scrubbed {}", path.display());
        } else {
            info!("{} is already clean", path.display());
        }
        Ok(changed)
    }

    // @moves: Original into the output directory
    fn move_into(&self, dir: &Path) -> Result<PathBuf> {
        let media = &self.config.input;
        let destination = dir.join(&media.file_name);
        self.fs_step(
            format!("move {} -> {}", media.path.display(), destination.display()),
            || FileManager::move_into_dir(&media.path, dir).map(|_| ()),
        )?;
        Ok(destination)
    }

    /// Park the original as `.old`, re-mux it back without subtitles, drop
    /// the parked copy. A failed re-mux restores the original.
    async fn strip_after_extract(&self, output_dir: &Path) -> Result<PathBuf> {
        let media = &self.config.input;
        let parked = media.parked_path();
        let destination = media.path_with_container(output_dir, &self.config.output_container());

        if parked.exists() {
            return Err(AppError::OutputExists(parked));
        }
        if destination != media.path && destination.exists() {
            return Err(AppError::OutputExists(destination));
        }

        let original_size = self.size_of(&media.path);
        self.fs_step(
            format!("move {} -> {}", media.path.display(), parked.display()),
            || FileManager::rename_file(&media.path, &parked),
        )?;

        info!("Removing subtitles from {}", media.file_name);
        if let Err(e) = self.toolkit.remux_without_subtitles(&parked, &destination).await {
            if !self.config.dry_run {
                discard_partial(&destination);
                FileManager::rename_file(&parked, &media.path)?;
                warn!("Restored {}", media.path.display());
            }
            return Err(e);
        }

        self.fs_step(format!("delete {}", parked.display()), || {
            FileManager::remove_file(&parked)
        })?;
        self.report_sizes(original_size, &destination);
        Ok(destination)
    }

    // @runs: File system mutation unless in dry-run mode
    fn fs_step<F: FnOnce() -> Result<()>>(&self, description: String, step: F) -> Result<()> {
        if self.config.dry_run {
            info!("[dry-run] {}", description);
            return Ok(());
        }
        debug!("{}", description);
        step()
    }

    fn size_of(&self, path: &Path) -> Option<u64> {
        FileManager::file_size(path).ok()
    }

    fn report_sizes(&self, original_size: Option<u64>, result: &Path) {
        if self.config.dry_run {
            return;
        }
        if let (Some(before), Ok(after)) = (original_size, FileManager::file_size(result)) {
            info!(
                "{}: {} -> {}",
                result.display(),
                format_bytes(before),
                format_bytes(after)
            );
        }
    }
}

/// One-line description used in listings and logs
pub fn describe_stream(stream: &SubtitleStream) -> String {
    let mut description = format!(
        "#{} {} {}",
        stream.index,
        language_utils::describe_language(&stream.language),
        stream.codec
    );
    if stream.forced {
        description.push_str(" [forced]");
    }
    if stream.hearing_impaired {
        description.push_str(" [hearing impaired]");
    }
    description
}

// @removes: Partial transcoder output, best effort
fn discard_partial(path: &Path) {
    if path.exists() {
        if let Err(e) = FileManager::remove_file(path) {
            warn!("Could not remove partial output {}: {}", path.display(), e);
        }
    }
}
