/*!
 * Parsing of the prober's human-readable stream description.
 *
 * The prober prints one line per stream, for example:
 *
 * ```text
 *   Stream #0:2(eng): Subtitle: subrip (default) (forced)
 *   Stream #0:3[0x1202](ger): Subtitle: hdmv_pgs_subtitle, 1920x1080
 * ```
 *
 * This module is the only place that knows that format.
 */

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{AppError, Result};

/// Language tag used when a stream carries none
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Subtitle codecs that are bitmaps and cannot be converted to text
pub const IMAGE_BASED_CODECS: &[&str] = &[
    "dvd_subtitle",
    "dvb_subtitle",
    "pgs_subtitle",
    "hdmv_pgs_subtitle",
    "xsub",
    "dvb_teletext",
];

// @const: A stream record of type subtitle
static SUBTITLE_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*Stream #.*: Subtitle:").unwrap()
});

// @const: container:track pair
static INDEX_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"#(\d+):(\d+)").unwrap()
});

// @const: Everything before the stream type
static HEADER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(.*?):\s*subtitle\b").unwrap()
});

// @const: 2-3 letter language code in parentheses
static LANGUAGE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\(([A-Za-z]{2,3})\)").unwrap()
});

// @const: Codec name following the stream type
static CODEC_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bsubtitle:\s*([A-Za-z0-9_]+)").unwrap()
});

/// Address of a stream inside a container, `container:track`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamIndex {
    pub container: u32,
    pub track: u32,
}

impl StreamIndex {
    pub fn new(container: u32, track: u32) -> Self {
        Self { container, track }
    }
}

impl fmt::Display for StreamIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.container, self.track)
    }
}

// @struct: One subtitle stream as reported by the prober
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleStream {
    pub index: StreamIndex,

    /// Bare language code, `unknown` if the stream has none
    pub language: String,

    pub forced: bool,

    pub hearing_impaired: bool,

    pub codec: String,

    /// Prober line this record was parsed from
    pub raw: String,
}

impl SubtitleStream {
    /// Language plus disposition suffixes, e.g. `eng.forced.hi`
    pub fn language_tag(&self) -> String {
        let mut tag = self.language.clone();
        if self.forced {
            tag.push_str(".forced");
        }
        if self.hearing_impaired {
            tag.push_str(".hi");
        }
        tag
    }

    pub fn is_image_based(&self) -> bool {
        IMAGE_BASED_CODECS.contains(&self.codec.as_str())
    }
}

impl fmt::Display for SubtitleStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} ({}) {}", self.index, self.language_tag(), self.codec)
    }
}

/// All subtitle streams of one file, split by whether they can become text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamListing {
    /// Text streams, in prober order
    pub text: Vec<SubtitleStream>,

    /// Image-based streams that are skipped, in prober order
    pub image_based: Vec<SubtitleStream>,
}

impl StreamListing {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.image_based.is_empty()
    }

    pub fn len(&self) -> usize {
        self.text.len() + self.image_based.len()
    }
}

/// Parse the prober output into a listing.
///
/// Fails without returning any stream if one of the subtitle lines has no
/// `container:track` index.
pub fn parse_stream_info(output: &str) -> Result<StreamListing> {
    let mut listing = StreamListing::default();
    let mut unresolved = Vec::new();

    for line in output.lines().filter(|l| SUBTITLE_LINE_REGEX.is_match(l)) {
        match parse_subtitle_line(line) {
            Some(stream) if stream.is_image_based() => listing.image_based.push(stream),
            Some(stream) => listing.text.push(stream),
            None => unresolved.push(line.trim().to_string()),
        }
    }

    if !unresolved.is_empty() {
        return Err(AppError::ParseAmbiguity { lines: unresolved });
    }

    Ok(listing)
}

// @parses: One subtitle line, None if the index is missing
fn parse_subtitle_line(line: &str) -> Option<SubtitleStream> {
    let caps = INDEX_REGEX.captures(line)?;
    let index = StreamIndex::new(caps[1].parse().ok()?, caps[2].parse().ok()?);

    let header = HEADER_REGEX
        .captures(line)
        .and_then(|c| c.get(1))
        .map_or(line, |m| m.as_str());

    let language = LANGUAGE_REGEX
        .captures(header)
        .map(|c| c[1].to_lowercase())
        .unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string());

    let codec = CODEC_REGEX
        .captures(line)
        .map(|c| c[1].to_lowercase())
        .unwrap_or_else(|| "unknown".to_string());

    Some(SubtitleStream {
        index,
        language,
        forced: line.contains("(forced)"),
        hearing_impaired: line.contains("(hearing impaired)"),
        codec,
        raw: line.trim().to_string(),
    })
}
