/*!
 * Tests for subtitle parsing and serialization
 */

use anyhow::Result;
use std::path::PathBuf;
use srt_translator::errors::SubtitleError;
use srt_translator::subtitle_processor::{ParsePolicy, SubtitleCollection, SubtitleEntry};
use crate::common;

/// Test parsing a well-formed file
#[test]
fn test_parseSrtString_withValidBlocks_shouldKeepOrderAndFields() {
    let entries = SubtitleCollection::parse_srt_string(common::HELLO_WORLD_SRT);

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0], SubtitleEntry::new(1, "00:00:01,000 --> 00:00:02,000", "Hello"));
    assert_eq!(entries[1], SubtitleEntry::new(2, "00:00:03,000 --> 00:00:04,000", "World"));
}

/// Multi-line content is joined with line breaks
#[test]
fn test_parseSrtString_withMultilineContent_shouldJoinLines() {
    let content = "1\n00:00:01,000 --> 00:00:02,000\nFirst line\nSecond line\n";
    let entries = SubtitleCollection::parse_srt_string(content);

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].content, "First line\nSecond line");
}

/// Empty and whitespace-only files parse to nothing
#[test]
fn test_parseSrtString_withEmptyInput_shouldReturnNoEntries() {
    assert!(SubtitleCollection::parse_srt_string("").is_empty());
    assert!(SubtitleCollection::parse_srt_string("  \n\n \n").is_empty());
}

/// Non-integer index and two-line blocks are dropped without affecting the rest
#[test]
fn test_parseSrtString_withMalformedBlocks_shouldSkipThem() {
    let content = "\
abc
00:00:01,000 --> 00:00:02,000
Bad index

2
00:00:03,000 --> 00:00:04,000

3
00:00:05,000 --> 00:00:06,000
Kept";
    let entries = SubtitleCollection::parse_srt_string(content);

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].index, 3);
    assert_eq!(entries[0].content, "Kept");
}

/// Several blank lines between blocks act as one separator
#[test]
fn test_parseSrtString_withExtraBlankLines_shouldSplitOnce() {
    let content = "1\nts1\nA\n\n\n\n2\nts2\nB\n\n";
    let entries = SubtitleCollection::parse_srt_string(content);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].content, "B");
}

/// Windows line endings and a byte order mark are accepted
#[test]
fn test_parseSrtString_withCrlfAndBom_shouldNormalize() {
    let content = "\u{feff}1\r\n00:00:01,000 --> 00:00:02,000\r\nHello\r\n\r\n2\r\n00:00:03,000 --> 00:00:04,000\r\nWorld\r\n";
    let entries = SubtitleCollection::parse_srt_string(content);

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].index, 1);
    assert_eq!(entries[0].timestamp, "00:00:01,000 --> 00:00:02,000");
    assert_eq!(entries[1].content, "World");
}

/// The timestamp line is never interpreted
#[test]
fn test_parseSrtString_withOddTimestamp_shouldKeepItVerbatim() {
    let entries = SubtitleCollection::parse_srt_string("1\nnot a time at all\nText");
    assert_eq!(entries[0].timestamp, "not a time at all");
}

/// Strict parsing names the first malformed block
#[test]
fn test_parseSrtStringWithPolicy_withStrictPolicy_shouldFailOnMalformedBlock() {
    let content = "1\nts\nA\n\nx\nts\nB";
    let result = SubtitleCollection::parse_srt_string_with_policy(content, ParsePolicy::Strict);

    match result {
        Err(SubtitleError::MalformedBlock { block, .. }) => assert_eq!(block, 2),
        other => panic!("expected MalformedBlock, got {:?}", other),
    }

    let lenient = SubtitleCollection::parse_srt_string_with_policy(content, ParsePolicy::Lenient).unwrap();
    assert_eq!(lenient.len(), 1);
}

/// Serialization emits one blank line after every entry
#[test]
fn test_toSrtString_shouldSeparateEntriesWithBlankLine() {
    let mut collection = SubtitleCollection::new(PathBuf::from("test.srt"));
    collection.entries.push(SubtitleEntry::new(1, "ts1", "A"));
    collection.entries.push(SubtitleEntry::new(2, "ts2", "B\nC"));

    assert_eq!(collection.to_srt_string(), "1\nts1\nA\n\n2\nts2\nB\nC\n\n");
}

/// Parse, serialize, parse again gives the same entries
#[test]
fn test_roundTrip_withoutTranslation_shouldBeIdempotent() {
    let original = format!("{}\n\n\n{}", common::numbered_srt(7), "8\nts\nmulti\nline");
    let entries = SubtitleCollection::parse_srt_string(&original);

    let mut collection = SubtitleCollection::new(PathBuf::from("test.srt"));
    collection.entries = entries.clone();
    let reparsed = SubtitleCollection::parse_srt_string(&collection.to_srt_string());

    assert_eq!(reparsed, entries);
    assert_eq!(reparsed.len(), 8);
}

/// Files are read and written through the collection
#[test]
fn test_fileRoundTrip_shouldWriteIntoNewDirectory() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "input.srt")?;

    let collection = SubtitleCollection::from_srt_file(&input, ParsePolicy::Lenient)?;
    assert_eq!(collection.entries.len(), 2);
    assert_eq!(collection.source_file, input);

    let output = temp_dir.path().join("nested").join("out.srt");
    collection.write_to_srt(&output)?;

    let reread = SubtitleCollection::from_srt_file(&output, ParsePolicy::Strict)?;
    assert_eq!(reread.entries, collection.entries);
    Ok(())
}

/// A missing file is a read error
#[test]
fn test_fromSrtFile_withMissingFile_shouldReturnReadError() {
    let result = SubtitleCollection::from_srt_file("does/not/exist.srt", ParsePolicy::Lenient);
    assert!(matches!(result, Err(SubtitleError::Read { .. })));
}
