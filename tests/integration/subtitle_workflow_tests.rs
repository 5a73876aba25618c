/*!
 * End-to-end tests: subtitle file in, translated subtitle file out
 */

use anyhow::Result;
use std::fs;
use srt_translator::errors::{SubtitleError, TranslationError};
use srt_translator::providers::mock::MockProvider;
use srt_translator::subtitle_processor::{ParsePolicy, SubtitleCollection};
use srt_translator::translation::{BatchOptions, BatchTranslator};
use crate::common;

/// The reference two-entry scenario with an uppercasing provider
#[tokio::test]
async fn test_translateFile_withUppercaseProvider_shouldWriteExpectedOutput() -> Result<()> {
    common::init_logger();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_subtitle(temp_dir.path(), "input.srt")?;
    let output = temp_dir.path().join("output.srt");

    let translator = BatchTranslator::new(Box::new(MockProvider::uppercase()));
    let report = translator
        .translate_file(&input, &output, &BatchOptions::new("fr").with_batch_size(10))
        .await?;

    assert_eq!(fs::read_to_string(&output)?, common::HELLO_WORLD_UPPERCASE);
    assert_eq!(report.total_entries, 2);
    assert_eq!(report.total_batches, 1);
    assert!(report.is_complete());
    Ok(())
}

/// Output has the same entries, in order, with timing untouched
#[tokio::test]
async fn test_translateFile_withManyBatches_shouldPreserveOrderAndTiming() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "long.srt", &common::numbered_srt(23))?;
    let output = temp_dir.path().join("long.fr.srt");

    let provider = MockProvider::uppercase();
    let translator = BatchTranslator::new(Box::new(provider.clone()));
    translator
        .translate_file(&input, &output, &BatchOptions::new("fr").with_batch_size(4))
        .await?;

    let before = SubtitleCollection::from_srt_file(&input, ParsePolicy::Strict)?;
    let after = SubtitleCollection::from_srt_file(&output, ParsePolicy::Strict)?;
    assert_eq!(after.entries.len(), 23);
    for (original, translated) in before.entries.iter().zip(&after.entries) {
        assert_eq!(original.index, translated.index);
        assert_eq!(original.timestamp, translated.timestamp);
        assert_eq!(original.content.to_uppercase(), translated.content);
    }
    assert_eq!(provider.batch_sizes(), vec![4, 4, 4, 4, 4, 3]);
    Ok(())
}

/// One failing batch leaves the rest of the file translated
#[tokio::test]
async fn test_translateFile_withFailingBatch_shouldWriteEverythingElseTranslated() -> Result<()> {
    common::init_logger();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "input.srt", &common::numbered_srt(6))?;
    let output = temp_dir.path().join("output.srt");

    let translator = BatchTranslator::new(Box::new(MockProvider::failing_batches(vec![0])));
    let report = translator
        .translate_file(&input, &output, &BatchOptions::new("fr").with_batch_size(2))
        .await?;

    assert_eq!(report.failed_batches, vec![0]);
    let written = SubtitleCollection::from_srt_file(&output, ParsePolicy::Strict)?;
    let contents: Vec<&str> = written.entries.iter().map(|e| e.content.as_str()).collect();
    assert_eq!(contents, vec!["line 1", "line 2", "LINE 3", "LINE 4", "LINE 5", "LINE 6"]);
    Ok(())
}

/// Malformed blocks are dropped, the rest is translated
#[tokio::test]
async fn test_translateFile_withMalformedBlocks_shouldSkipThem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let content = "1\n00:00:01,000 --> 00:00:02,000\nHello\n\nnope\nts\nDropped\n\n3\n00:00:05,000 --> 00:00:06,000\nWorld\n";
    let input = common::create_test_file(temp_dir.path(), "input.srt", content)?;
    let output = temp_dir.path().join("output.srt");

    let translator = BatchTranslator::new(Box::new(MockProvider::uppercase()));
    let report = translator.translate_file(&input, &output, &BatchOptions::new("fr")).await?;

    assert_eq!(report.total_entries, 2);
    assert_eq!(
        fs::read_to_string(&output)?,
        "1\n00:00:01,000 --> 00:00:02,000\nHELLO\n\n3\n00:00:05,000 --> 00:00:06,000\nWORLD\n\n"
    );
    Ok(())
}

/// Strict parsing refuses the same file and writes nothing
#[tokio::test]
async fn test_translateFile_withStrictPolicy_shouldFailOnMalformedBlock() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "input.srt", "1\nts\nA\n\nnope\nts\nB\n")?;
    let output = temp_dir.path().join("output.srt");

    let translator = BatchTranslator::new(Box::new(MockProvider::uppercase()));
    let options = BatchOptions::new("fr").with_parse_policy(ParsePolicy::Strict);
    let result = translator.translate_file(&input, &output, &options).await;

    assert!(matches!(
        result,
        Err(TranslationError::Subtitle(SubtitleError::MalformedBlock { block: 2, .. }))
    ));
    assert!(!output.exists());
    Ok(())
}

/// An empty input is not an error and produces an empty output
#[tokio::test]
async fn test_translateFile_withEmptyInput_shouldWriteEmptyOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "empty.srt", "\n\n")?;
    let output = temp_dir.path().join("empty.fr.srt");

    let provider = MockProvider::uppercase();
    let translator = BatchTranslator::new(Box::new(provider.clone()));
    let report = translator.translate_file(&input, &output, &BatchOptions::new("fr")).await?;

    assert_eq!(report.total_entries, 0);
    assert_eq!(provider.batch_calls(), 0);
    assert_eq!(fs::read_to_string(&output)?, "");
    Ok(())
}

/// A missing input file is reported, not papered over
#[tokio::test]
async fn test_translateFile_withMissingInput_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let output = temp_dir.path().join("out.srt");

    let translator = BatchTranslator::new(Box::new(MockProvider::uppercase()));
    let result = translator
        .translate_file(&temp_dir.path().join("missing.srt"), &output, &BatchOptions::new("fr"))
        .await;

    assert!(matches!(result, Err(TranslationError::Subtitle(SubtitleError::Read { .. }))));
    assert!(!output.exists());
    Ok(())
}
