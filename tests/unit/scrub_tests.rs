/*!
 * Tests for the scrub rules on in-memory text
 */

use subscrub::scrub::scrub_text;

/// Test the bracketed cue followed by a speaker label
#[test]
fn test_scrub_text_withSoundCueAndSpeaker_shouldKeepDialogueOnly() {
    assert_eq!(scrub_text("[explosion]\nJOHN: Get down!"), "Get down!");
}

/// Test that a speaker label alone on its line goes with its newline
#[test]
fn test_scrub_text_withSpeakerOnOwnLine_shouldJoinDialogue() {
    assert_eq!(scrub_text("MARY JANE 2:\nOver here."), "Over here.");
}

/// Test style codes, html tags and parentheses together
#[test]
fn test_scrub_text_withMarkup_shouldStripIt() {
    let input = "{\\an8}<i>(sighs) Fine.</i>";
    assert_eq!(scrub_text(input), "Fine.");
}

/// Test that full caps sound effect lines disappear
#[test]
fn test_scrub_text_withCapsLine_shouldRemoveLine() {
    let input = "1\n00:00:01,000 --> 00:00:02,000\nBANG, BANG!\nI said run!\n";
    assert_eq!(scrub_text(input), "1\n00:00:01,000 --> 00:00:02,000\nI said run!\n");
}

/// Test that music notes are stripped at both ends of a line
#[test]
fn test_scrub_text_withMusicNotes_shouldStripLeaderAndTrailer() {
    assert_eq!(scrub_text("♪ Rain on the roof ♪\n"), "Rain on the roof\n");
}

/// Test that cue numbers, timestamps and plain dialogue survive
#[test]
fn test_scrub_text_withCleanSubtitle_shouldBeUnchanged() {
    let input = "1\n00:00:01,000 --> 00:00:04,000\nThis is a test subtitle.\n\n2\n00:00:05,000 --> 00:00:09,000\nI think so. OK?\n";
    assert_eq!(scrub_text(input), input);
}

/// Test that a sung caps line goes in one pass
#[test]
fn test_scrub_text_withCapsLineInNotes_shouldRemoveLine() {
    let input = "1\n00:00:01,000 --> 00:00:02,000\n♪ LA LA LA ♪\nHello\n";
    assert_eq!(scrub_text(input), "1\n00:00:01,000 --> 00:00:02,000\nHello\n");
}

/// Test that capitals followed by a colon mid-sentence are not a speaker
#[test]
fn test_scrub_text_withCapsColonMidLine_shouldKeepText() {
    assert_eq!(scrub_text("Meet at 10 AM: sharp.\n"), "Meet at 10 AM: sharp.\n");
}

/// Test that dialogue dashes survive label removal
#[test]
fn test_scrub_text_withDashedSpeakers_shouldKeepDashes() {
    assert_eq!(scrub_text("- JOHN: Run!\n- MARY: Why?\n"), "- Run!\n- Why?\n");
}

/// Test that scrubbing twice equals scrubbing once
#[test]
fn test_scrub_text_appliedTwice_shouldBeIdempotent() {
    let samples = [
        "1\r\n00:00:01,000 --> 00:00:04,000\r\n[explosion]\r\nJOHN: Get down!\r\n",
        "<b>[door\nslams]</b>\nWHO: Who's there?\n(gasps)\n\nSIRENS WAILING\n",
        "♪ ♪\n{\\i1}DOCTOR: (quietly) Hold still.{\\i0}\n",
        "Hi [laughs]\n\n2\n00:00:05,000 --> 00:00:06,000\nBOB: (A) B\n",
        "1\n00:00:01,000 --> 00:00:02,000\n♪ LA LA LA ♪\nHello\n",
        "♪ JOHN: BOB: Sing along ♪\n- MARY: ♫ HEY, HEY! ♫\n",
    ];

    for sample in samples {
        let once = scrub_text(sample);
        assert_eq!(scrub_text(&once), once, "not idempotent for {:?}", sample);
    }
}
