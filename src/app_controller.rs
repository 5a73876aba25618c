use anyhow::{anyhow, Context, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::errors::RegistryError;
use crate::file_utils::FileManager;
use crate::providers::{Provider, ProviderRegistry};
use crate::translation::{BatchOptions, BatchReport, BatchTranslator};

// @module: Application controller for subtitle processing

/// What happened to one input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Translated and written
    Translated {
        /// Output file
        output: PathBuf,
        /// Per-batch results
        report: BatchReport,
    },
    /// Output already existed and overwriting was not forced
    Skipped {
        /// Existing output file
        output: PathBuf,
    },
}

/// Totals of a run over one file or a directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Files translated and written
    pub translated: usize,
    /// Files skipped because their output existed
    pub skipped: usize,
    /// Files that could not be processed
    pub failed: usize,
}

/// Main application controller for subtitle translation
pub struct Controller {
    /// App configuration
    config: Config,

    /// Providers selectable by name
    registry: ProviderRegistry,
}

impl Controller {
    /// Create a controller from a config file.
    ///
    /// `overrides` is applied on top of the file contents. A missing file is
    /// created with default settings, but only after the selected provider
    /// is known to be registered and the configuration is valid.
    pub fn from_config_file(
        path: &Path,
        registry: ProviderRegistry,
        overrides: impl FnOnce(&mut Config),
    ) -> Result<Self> {
        let existing = Config::from_file(path)?;
        let create_default = existing.is_none();

        let mut config = existing.unwrap_or_default();
        overrides(&mut config);
        registry.ensure_registered(&config.provider)?;
        let controller = Self::with_registry(config, registry)?;

        if create_default {
            warn!("Config file not found at '{}', creating default config.", path.display());
            Config::default().save(path)?;
        }
        Ok(controller)
    }

    /// Create a new controller with a caller-supplied registry
    pub fn with_registry(config: Config, registry: ProviderRegistry) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config, registry })
    }

    /// The active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The provider registry
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Instantiate the configured provider
    pub fn create_provider(&self) -> Result<Box<dyn Provider>, RegistryError> {
        self.registry
            .create(&self.config.provider, &self.config.active_provider_config())
    }

    /// Translate a subtitle file, or every subtitle file under a directory
    ///
    /// For a file, `output` is the output file; for a directory it is the
    /// output directory. Without it, outputs are written next to the inputs
    /// as `<stem>.<target>.srt`.
    pub async fn run(&self, input: PathBuf, output: Option<PathBuf>, force_overwrite: bool) -> Result<RunSummary> {
        // Fail on a bad provider name before touching any file
        let provider = self.create_provider()?;
        let translator = BatchTranslator::new(provider);
        let options = BatchOptions::from_config(&self.config);

        if FileManager::file_exists(&input) {
            let output = output.unwrap_or_else(|| FileManager::sibling_output_path(&input, &options.target_language));
            let multi_progress = MultiProgress::new();
            let outcome = self
                .translate_file(&translator, &options, &input, &output, force_overwrite, &multi_progress)
                .await?;

            let mut summary = RunSummary::default();
            match outcome {
                FileOutcome::Translated { .. } => summary.translated += 1,
                FileOutcome::Skipped { .. } => summary.skipped += 1,
            }
            Ok(summary)
        } else if FileManager::dir_exists(&input) {
            self.run_folder(&translator, &options, &input, output.as_deref(), force_overwrite)
                .await
        } else {
            Err(anyhow!("Input path does not exist: {:?}", input))
        }
    }

    /// Translate every `.srt` file under `input_dir`, skipping earlier outputs
    async fn run_folder(
        &self,
        translator: &BatchTranslator,
        options: &BatchOptions,
        input_dir: &Path,
        output_dir: Option<&Path>,
        force_overwrite: bool,
    ) -> Result<RunSummary> {
        let start_time = Instant::now();

        let files: Vec<PathBuf> = FileManager::find_files(input_dir, "srt")?
            .into_iter()
            .filter(|file| !FileManager::is_translation_output(file, &options.target_language))
            .collect();

        if files.is_empty() {
            return Err(anyhow!("No subtitle files found in directory: {:?}", input_dir));
        }

        let multi_progress = MultiProgress::new();
        let folder_pb = multi_progress.add(ProgressBar::new(files.len() as u64));
        folder_pb.set_style(Self::bar_style("files"));
        folder_pb.set_message("Processing files");

        let mut summary = RunSummary::default();
        for file in &files {
            let file_name = file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Processing: {}", file_name));

            let output = match output_dir {
                Some(dir) => FileManager::generate_output_path(file, dir, &options.target_language, "srt"),
                None => FileManager::sibling_output_path(file, &options.target_language),
            };

            match self
                .translate_file(translator, options, file, &output, force_overwrite, &multi_progress)
                .await
            {
                Ok(FileOutcome::Translated { .. }) => summary.translated += 1,
                Ok(FileOutcome::Skipped { .. }) => summary.skipped += 1,
                Err(e) => {
                    error!("Error processing file {}: {:#}", file_name, e);
                    summary.failed += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");
        info!(
            "Folder processing completed in {}: {} translated, {} skipped, {} errors",
            Self::format_duration(start_time.elapsed()),
            summary.translated,
            summary.skipped,
            summary.failed
        );

        Ok(summary)
    }

    /// Translate one file with a per-batch progress bar
    async fn translate_file(
        &self,
        translator: &BatchTranslator,
        options: &BatchOptions,
        input: &Path,
        output: &Path,
        force_overwrite: bool,
        multi_progress: &MultiProgress,
    ) -> Result<FileOutcome> {
        if output.exists() && !force_overwrite {
            warn!(
                "Skipping {}, translation already exists (use -f to force overwrite)",
                output.display()
            );
            return Ok(FileOutcome::Skipped { output: output.to_path_buf() });
        }

        let start_time = Instant::now();
        info!(
            "Translating {} to {} with {}",
            input.display(),
            options.target_language,
            translator.provider().name()
        );

        let progress_bar = multi_progress.add(ProgressBar::new(0));
        progress_bar.set_style(Self::bar_style("batches"));

        let result = translator
            .translate_file_with_progress(input, output, options, |completed, total| {
                progress_bar.set_length(total as u64);
                progress_bar.set_position(completed as u64);
            })
            .await;
        progress_bar.finish_and_clear();

        let report = result.with_context(|| format!("Failed to translate {}", input.display()))?;
        if !report.failed_batches.is_empty() {
            warn!(
                "{} of {} batches failed for {}; their entries keep the original text",
                report.failed_batches.len(),
                report.total_batches,
                input.display()
            );
        }
        info!(
            "Success: {} ({})",
            output.display(),
            Self::format_duration(start_time.elapsed())
        );

        Ok(FileOutcome::Translated {
            output: output.to_path_buf(),
            report,
        })
    }

    fn bar_style(unit: &str) -> ProgressStyle {
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {} ({{percent}}%) {{msg}}",
                unit
            ))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░")
    }

    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;
        if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
