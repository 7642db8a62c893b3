/*!
 * Tests for prober output parsing
 */

use subscrub::errors::AppError;
use subscrub::stream_info::{StreamIndex, UNKNOWN_LANGUAGE, parse_stream_info};
use crate::common;

/// Test that every text subtitle line becomes one record, in order
#[test]
fn test_parse_stream_info_withMixedStreams_shouldKeepOrder() {
    let listing = parse_stream_info(common::PROBE_MIXED).unwrap();

    let indices: Vec<StreamIndex> = listing.text.iter().map(|s| s.index).collect();
    assert_eq!(
        indices,
        vec![StreamIndex::new(0, 2), StreamIndex::new(0, 3), StreamIndex::new(0, 5)]
    );
    assert_eq!(listing.text[0].language_tag(), "eng");
    assert_eq!(listing.text[1].language_tag(), "spa.forced");
    assert_eq!(listing.text[0].codec, "subrip");
}

/// Test that bitmap codecs are reported separately
#[test]
fn test_parse_stream_info_withPgsStream_shouldSkipAsImageBased() {
    let listing = parse_stream_info(common::PROBE_MIXED).unwrap();

    assert_eq!(listing.image_based.len(), 1);
    assert_eq!(listing.image_based[0].index, StreamIndex::new(0, 4));
    assert_eq!(listing.image_based[0].codec, "hdmv_pgs_subtitle");
    assert_eq!(listing.len(), 4);
}

/// Test that forced comes before hearing impaired in the tag
#[test]
fn test_language_tag_withForcedAndHearingImpaired_shouldEndWithForcedHi() {
    let listing = parse_stream_info(common::PROBE_MIXED).unwrap();
    let stream = &listing.text[2];

    assert!(stream.forced);
    assert!(stream.hearing_impaired);
    assert_eq!(stream.language_tag(), "eng.forced.hi");
}

/// Test that a stream without a language gets the unknown tag
#[test]
fn test_parse_stream_info_withoutLanguage_shouldDefaultToUnknown() {
    let output = "  Stream #0:2: Subtitle: subrip\n  Stream #0:3: Subtitle: mov_text (hearing impaired)\n";
    let listing = parse_stream_info(output).unwrap();

    assert_eq!(listing.text.len(), 2);
    assert_eq!(listing.text[0].language, UNKNOWN_LANGUAGE);
    assert_eq!(listing.text[1].language_tag(), "unknown.hi");
}

/// Test that N well-formed lines give exactly N records with non-empty tags
#[test]
fn test_parse_stream_info_withManyLines_shouldReturnSameCount() {
    let languages = ["eng", "", "fr", "ger", "", "jpn"];
    let output: String = languages
        .iter()
        .enumerate()
        .map(|(i, lang)| {
            if lang.is_empty() {
                format!("    Stream #0:{}: Subtitle: subrip\n", i + 1)
            } else {
                format!("    Stream #0:{}({}): Subtitle: subrip\n", i + 1, lang)
            }
        })
        .collect();

    let listing = parse_stream_info(&output).unwrap();

    assert_eq!(listing.text.len(), languages.len());
    for (i, stream) in listing.text.iter().enumerate() {
        assert_eq!(stream.index, StreamIndex::new(0, i as u32 + 1));
        assert!(!stream.language_tag().is_empty());
    }
}

/// Test that one unresolvable line fails the whole parse
#[test]
fn test_parse_stream_info_withUnresolvedIndex_shouldFailWholeBatch() {
    let output = "  Stream #0:2(eng): Subtitle: subrip\n  Stream #?(spa): Subtitle: subrip\n";
    let result = parse_stream_info(output);

    match result {
        Err(AppError::ParseAmbiguity { lines }) => {
            assert_eq!(lines, vec!["Stream #?(spa): Subtitle: subrip".to_string()]);
        }
        other => panic!("expected ParseAmbiguity, got {:?}", other),
    }
}

/// Test that output without subtitle streams gives an empty listing
#[test]
fn test_parse_stream_info_withoutSubtitles_shouldBeEmpty() {
    let listing = parse_stream_info(common::PROBE_NO_SUBTITLES).unwrap();
    assert!(listing.is_empty());
}

/// Test that stream index display matches the -map specifier form
#[test]
fn test_stream_index_display_shouldUseColonPair() {
    assert_eq!(StreamIndex::new(1, 12).to_string(), "1:12");
}
