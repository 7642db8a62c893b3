/*!
 * Common test utilities for the subscrub test suite
 */

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Result;
use tempfile::TempDir;

use subscrub::{Command, Config, MediaFile};

/// Prober output for a file with video, audio and four subtitle streams
pub const PROBE_MIXED: &str = r#"Input #0, matroska,webm, from 'film.mkv':
  Metadata:
    title           : Film
  Duration: 01:42:17.02, start: 0.000000, bitrate: 8364 kb/s
  Stream #0:0(eng): Video: h264 (High), yuv420p(progressive), 1920x1080, 23.98 fps (default)
  Stream #0:1(eng): Audio: ac3, 48000 Hz, 5.1(side), fltp, 448 kb/s (default)
  Stream #0:2(eng): Subtitle: subrip (default)
    Metadata:
      title           : English
  Stream #0:3(spa): Subtitle: subrip (forced)
  Stream #0:4(eng): Subtitle: hdmv_pgs_subtitle, 1920x1080
  Stream #0:5(eng): Subtitle: ass (forced) (hearing impaired)
"#;

/// Prober output for a file without subtitles
pub const PROBE_NO_SUBTITLES: &str = r#"Input #0, mov,mp4,m4a,3gp,3g2,mj2, from 'clip.mp4':
  Duration: 00:00:30.00, start: 0.000000, bitrate: 1200 kb/s
  Stream #0:0[0x1](und): Video: h264 (avc1 / 0x31637661), yuv420p, 1280x720
  Stream #0:1[0x2](und): Audio: aac (LC) (mp4a / 0x6134706D), 44100 Hz, stereo
"#;

/// Subtitle with sound cues, speaker labels, markup and CRLF line endings
pub const DIRTY_SUBTITLE: &str = "1\r\n00:00:01,000 --> 00:00:04,000\r\n[explosion]\r\nJOHN: Get down!\r\n\r\n2\r\n00:00:05,000 --> 00:00:09,000\r\n<i>(whispering)\r\nIs it over?</i>\r\n\r\n3\r\n00:00:10,000 --> 00:00:14,000\r\n♪ Rain on the roof ♪\r\n";

/// `DIRTY_SUBTITLE` after scrubbing
pub const CLEAN_SUBTITLE: &str = "1\n00:00:01,000 --> 00:00:04,000\nGet down!\n\n2\n00:00:05,000 --> 00:00:09,000\nIs it over?\n\n3\n00:00:10,000 --> 00:00:14,000\nRain on the roof\n";

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a fake media container; the mock toolkit never reads it
pub fn create_test_media(dir: &Path, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, "not really a matroska file")
}

/// Creates a sample subtitle file full of hearing-impaired clutter
pub fn create_test_subtitle(dir: &Path, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, DIRTY_SUBTITLE)
}

/// Invocation context for `command` on `path` with every option off
pub fn config_for(command: Command, path: &Path) -> Result<Config> {
    Ok(Config::new(command, MediaFile::resolve(path)?))
}
