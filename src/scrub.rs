/*!
 * Text subtitle scrubbing.
 *
 * Removes hearing-impaired cues and formatting leftovers from a text
 * subtitle. The rules run in a fixed order over the whole file content:
 * later rules rely on markup already being gone, and annotations may span
 * several lines inside one cue.
 */

use std::path::Path;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::Result;
use crate::file_utils::FileManager;

/// A single text substitution of the scrub pass
#[derive(Debug)]
pub struct ScrubRule {
    pub name: &'static str,
    pattern: Regex,
    replacement: &'static str,
}

impl ScrubRule {
    fn new(name: &'static str, pattern: &str, replacement: &'static str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).unwrap(),
            replacement,
        }
    }

    /// Apply the rule to the full content
    pub fn apply(&self, content: &str) -> String {
        self.pattern.replace_all(content, self.replacement).into_owned()
    }
}

// Annotation bodies may continue on the next line but never over a blank
// line, which ends the cue.
const BRACKET_BODY: &str = r"\[(?:[^\]\n]|\n[^\]\n])*\]";
const PAREN_BODY: &str = r"\((?:[^)\n]|\n[^)\n])*\)";
const NOTE: &str = r"(?:[♪♫]|â™ª)";
const SPEAKER: &str = r"[A-Z]{2,}[A-Z0-9 ]*:";

// @const: Ordered rule set
static SCRUB_RULES: Lazy<Vec<ScrubRule>> = Lazy::new(|| {
    vec![
        ScrubRule::new("normalize-line-endings", r"\r\n?", "\n"),
        ScrubRule::new("style-codes", r"\{\\[^}]*\}", ""),
        ScrubRule::new("html-tags", r"<[^<>\n]*>", ""),
        // A whole-line annotation goes away with its newline; an inline one
        // takes the blanks after it.
        ScrubRule::new(
            "bracketed-annotations",
            &format!(r"(?m)^[ \t]*{BRACKET_BODY}[ \t]*\n|{BRACKET_BODY}[ \t]*"),
            "",
        ),
        ScrubRule::new(
            "parenthesized-annotations",
            &format!(r"(?m)^[ \t]*{PAREN_BODY}[ \t]*\n|{PAREN_BODY}[ \t]*"),
            "",
        ),
        // Labels only count at the start of a line, after an optional dash
        // or leading notes, which are kept.
        ScrubRule::new(
            "speaker-labels",
            &format!(r"(?m)^((?:[ \t]*{NOTE})*[ \t]*(?:-[ \t]*)?)(?:{SPEAKER}[ \t]*)+\n?"),
            "$1",
        ),
        ScrubRule::new(
            "caps-lines",
            &format!(r"(?m)^(?:[ \t]*{NOTE})*[A-Z ,!]*[A-Z]{{2}}[A-Z ,!]*(?:{NOTE}[ \t]*)*(?:\n|\z)"),
            "",
        ),
        ScrubRule::new(
            "music-notes",
            &format!(r"(?m)^[ \t]*{NOTE}(?:[ \t]*{NOTE})*[ \t]*|[ \t]*{NOTE}(?:[ \t]*{NOTE})*[ \t]*$"),
            "",
        ),
    ]
});

/// The rule set in application order
pub fn rules() -> &'static [ScrubRule] {
    &SCRUB_RULES
}

/// Run every rule over `content`
pub fn scrub_text(content: &str) -> String {
    SCRUB_RULES
        .iter()
        .fold(content.to_string(), |text, rule| rule.apply(&text))
}

/// Scrub a subtitle file in place.
///
/// Returns `true` if the file content changed. An unchanged file is not
/// rewritten.
pub fn scrub_file<P: AsRef<Path>>(path: P) -> Result<bool> {
    let path = path.as_ref();
    let original = FileManager::read_to_string(path)?;
    let scrubbed = scrub_text(&original);

    if scrubbed == original {
        debug!("Nothing to scrub in {}", path.display());
        return Ok(false);
    }

    FileManager::write_to_file(path, &scrubbed)?;
    debug!(
        "Scrubbed {} ({} -> {} bytes)",
        path.display(),
        original.len(),
        scrubbed.len()
    );
    Ok(true)
}
