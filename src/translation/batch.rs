/*!
 * Batch translation processing.
 *
 * Entries are cut into consecutive batches, each batch is sent to the
 * provider in one `batch_translate` call, and the results are written back
 * onto the entries positionally. Batches run strictly one after another.
 * A batch that fails as a whole keeps its original text and never stops
 * the batches after it.
 */

use log::{debug, error, info, warn};
use std::ops::Range;
use std::path::Path;

use crate::app_config::{Config, DEFAULT_BATCH_SIZE};
use crate::errors::{SubtitleError, TranslationError};
use crate::providers::Provider;
use crate::subtitle_processor::{normalize_content, ParsePolicy, SubtitleCollection, SubtitleEntry};

/// Split `len` items into consecutive ranges of at most `batch_size`
///
/// All ranges hold `batch_size` items except possibly the last one.
pub fn partition(len: usize, batch_size: usize) -> Result<Vec<Range<usize>>, SubtitleError> {
    if batch_size == 0 {
        return Err(SubtitleError::InvalidBatchSize(batch_size));
    }

    Ok((0..len)
        .step_by(batch_size)
        .map(|start| start..(start + batch_size).min(len))
        .collect())
}

/// Options for one translation run
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOptions {
    /// Target language code
    pub target_language: String,
    /// Source language code, `None` to let the provider detect it
    pub source_language: Option<String>,
    /// Maximum number of entries per provider call
    pub batch_size: usize,
    /// How malformed input blocks are handled
    pub parse_policy: ParsePolicy,
}

impl BatchOptions {
    /// Options with the default batch size and lenient parsing
    pub fn new(target_language: impl Into<String>) -> Self {
        Self {
            target_language: target_language.into(),
            source_language: None,
            batch_size: DEFAULT_BATCH_SIZE,
            parse_policy: ParsePolicy::default(),
        }
    }

    /// Options taken from the application configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            target_language: config.target_language.clone(),
            source_language: config.source_language.clone(),
            batch_size: config.batch_size,
            parse_policy: config.parse_policy(),
        }
    }

    /// Set the source language
    pub fn with_source_language(mut self, source_language: impl Into<String>) -> Self {
        self.source_language = Some(source_language.into());
        self
    }

    /// Set the batch size
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the parse policy
    pub fn with_parse_policy(mut self, parse_policy: ParsePolicy) -> Self {
        self.parse_policy = parse_policy;
        self
    }
}

/// Outcome of a translation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Number of entries processed
    pub total_entries: usize,
    /// Number of batches sent
    pub total_batches: usize,
    /// 0-based indices of batches that failed as a whole
    pub failed_batches: Vec<usize>,
    /// Entries left untouched because their batch failed
    pub failed_entries: usize,
    /// Entries whose text was replaced by a translation
    pub translated_entries: usize,
    /// Entries the provider passed through after a caught failure
    pub passthrough_entries: usize,
}

impl BatchReport {
    /// True if every entry was translated
    pub fn is_complete(&self) -> bool {
        self.translated_entries == self.total_entries
    }

    /// Entries that kept their original text, for whatever reason
    pub fn untranslated_entries(&self) -> usize {
        self.failed_entries + self.passthrough_entries
    }
}

/// Batch translator for processing subtitle entries in batches
#[derive(Debug)]
pub struct BatchTranslator {
    /// The provider every batch is sent to
    provider: Box<dyn Provider>,
}

impl BatchTranslator {
    /// Create a new batch translator
    pub fn new(provider: Box<dyn Provider>) -> Self {
        Self { provider }
    }

    /// The provider in use
    pub fn provider(&self) -> &dyn Provider {
        self.provider.as_ref()
    }

    /// Translate entries in place
    ///
    /// `progress` is called with `(completed_batches, total_batches)` after
    /// every batch, failed or not.
    pub async fn translate_entries(
        &self,
        entries: &mut [SubtitleEntry],
        options: &BatchOptions,
        progress: impl Fn(usize, usize),
    ) -> Result<BatchReport, SubtitleError> {
        let batches = partition(entries.len(), options.batch_size)?;
        let total_batches = batches.len();
        let source_language = options.source_language.as_deref();

        let mut report = BatchReport {
            total_entries: entries.len(),
            total_batches,
            ..Default::default()
        };

        for (batch_index, range) in batches.into_iter().enumerate() {
            let batch = &mut entries[range];
            let texts: Vec<String> = batch.iter().map(|entry| entry.content.clone()).collect();
            debug!(
                "Translating batch {} of {} ({} entries) with {}",
                batch_index + 1,
                total_batches,
                texts.len(),
                self.provider.name()
            );

            let outcome = self
                .provider
                .batch_translate(&texts, &options.target_language, source_language)
                .await
                .map_err(TranslationError::from)
                .and_then(|results| {
                    if results.len() == texts.len() {
                        Ok(results)
                    } else {
                        Err(TranslationError::ResultCountMismatch {
                            expected: texts.len(),
                            actual: results.len(),
                        })
                    }
                });

            match outcome {
                Ok(results) => {
                    for (entry, result) in batch.iter_mut().zip(results) {
                        if result.is_passthrough() {
                            report.passthrough_entries += 1;
                            continue;
                        }
                        match normalize_content(&result.translated_text) {
                            Some(content) => {
                                report.translated_entries += 1;
                                entry.content = content;
                            }
                            None => {
                                warn!("Empty translation for entry {}, keeping original text", entry.index);
                                report.passthrough_entries += 1;
                            }
                        }
                    }
                }
                Err(e) => {
                    error!("Batch {} of {} failed, keeping original text: {}", batch_index + 1, total_batches, e);
                    report.failed_batches.push(batch_index);
                    report.failed_entries += batch.len();
                }
            }

            progress(batch_index + 1, total_batches);
        }

        if report.is_complete() {
            info!(
                "Translated {} entries in {} batches",
                report.translated_entries, report.total_batches
            );
        } else {
            warn!(
                "Translated {} of {} entries; {} batches failed, {} entries passed through",
                report.translated_entries,
                report.total_entries,
                report.failed_batches.len(),
                report.passthrough_entries
            );
        }

        Ok(report)
    }

    /// Parse `input`, translate it and write the result to `output`
    ///
    /// An input without any valid entry produces an empty output file.
    pub async fn translate_file(
        &self,
        input: &Path,
        output: &Path,
        options: &BatchOptions,
    ) -> Result<BatchReport, TranslationError> {
        self.translate_file_with_progress(input, output, options, |_, _| {}).await
    }

    /// Same as `translate_file`, reporting progress after every batch
    pub async fn translate_file_with_progress(
        &self,
        input: &Path,
        output: &Path,
        options: &BatchOptions,
        progress: impl Fn(usize, usize),
    ) -> Result<BatchReport, TranslationError> {
        // Rejected before the input is read
        if options.batch_size == 0 {
            return Err(SubtitleError::InvalidBatchSize(0).into());
        }

        let mut collection = SubtitleCollection::from_srt_file(input, options.parse_policy)?;
        if collection.entries.is_empty() {
            warn!("No subtitle entries found in {}", input.display());
        }

        let report = self
            .translate_entries(&mut collection.entries, options, progress)
            .await?;

        collection.write_to_srt(output)?;
        debug!("Wrote {} entries to {}", collection.entries.len(), output.display());

        Ok(report)
    }
}
