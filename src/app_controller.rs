use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::app_config::{BackendProvider, Config};
use crate::file_utils::FileManager;
use crate::providers::google::GoogleCloud;
use crate::providers::local_server::LocalServer;
use crate::providers::TranslationBackend;
use crate::subtitle_processor::SubtitleDocument;
use crate::translation::TranslationService;

// @module: Application controller for batch subtitle translation

/// Result of processing one file. Produced by the file pipeline, consumed by
/// the folder run; never thrown across a file boundary.
#[derive(Debug)]
pub enum FileOutcome {
    /// Output written; `degraded_batches > 0` means some batches fell back
    /// to untranslated source text
    Processed {
        /// Source subtitle file
        input: PathBuf,
        /// Written translation
        output: PathBuf,
        /// Batches that degraded to passthrough
        degraded_batches: usize,
    },
    /// Nothing to do for this file
    Skipped {
        /// Source subtitle file
        input: PathBuf,
        /// Why the file was skipped
        reason: String,
    },
    /// The file could not be processed; the run continues
    Failed {
        /// Source subtitle file
        input: PathBuf,
        /// What went wrong
        reason: String,
    },
}

impl FileOutcome {
    /// The input file this outcome belongs to
    pub fn input(&self) -> &Path {
        match self {
            Self::Processed { input, .. } | Self::Skipped { input, .. } | Self::Failed { input, .. } => input,
        }
    }

    /// True for a Processed outcome with at least one degraded batch
    pub fn is_partial(&self) -> bool {
        matches!(self, Self::Processed { degraded_batches, .. } if *degraded_batches > 0)
    }

    /// True for a fully translated file
    pub fn is_clean(&self) -> bool {
        matches!(self, Self::Processed { degraded_batches: 0, .. })
    }
}

/// Aggregated outcomes of one folder run
#[derive(Debug)]
pub struct RunReport {
    /// One outcome per discovered file
    pub outcomes: Vec<FileOutcome>,
}

impl RunReport {
    /// Fully translated files
    pub fn processed_clean(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_clean()).count()
    }

    /// Files written with some batches degraded to source text
    pub fn processed_partial(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_partial()).count()
    }

    /// Files skipped
    pub fn skipped(&self) -> usize {
        self.outcomes.iter().filter(|o| matches!(o, FileOutcome::Skipped { .. })).count()
    }

    /// Files that failed
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| matches!(o, FileOutcome::Failed { .. })).count()
    }

    /// Whether the process should exit non-zero
    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    /// One-line run summary
    pub fn summary(&self) -> String {
        format!(
            "Run completed: {} translated, {} partial, {} skipped, {} failed",
            self.processed_clean(),
            self.processed_partial(),
            self.skipped(),
            self.failed()
        )
    }
}

/// Caller-issued stop signal.
///
/// Cancelling prevents not-yet-started files from being processed; files
/// already in flight finish cleanly, so no partial output is left behind.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Create an unset flag
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a stop
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether a stop was requested
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Main application controller for batch subtitle translation
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Shared per-run translation service
    service: Arc<TranslationService>,

    // @field: Stop signal checked before each file starts
    cancel: CancelFlag,

    // @field: Overwrite existing translations
    force_overwrite: bool,
}

impl Controller {
    // @method: Create a controller with the backend named in the configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let backend = create_backend(&config)?;
        Ok(Self::with_backend(config, backend))
    }

    /// Create a controller around an explicit backend, bypassing the factory
    pub fn with_backend(config: Config, backend: Arc<dyn TranslationBackend>) -> Self {
        let service = Arc::new(TranslationService::new(backend, config.batch.clone()));
        Self {
            config,
            service,
            cancel: CancelFlag::new(),
            force_overwrite: false,
        }
    }

    /// Overwrite existing translations instead of skipping them
    pub fn force_overwrite(mut self, force: bool) -> Self {
        self.force_overwrite = force;
        self
    }

    /// Handle for requesting a graceful stop from another task
    pub fn cancel_handle(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Process one subtitle file to completion.
    ///
    /// Every failure mode is converted into a `FileOutcome`; this method
    /// never raises past the file boundary.
    pub async fn process_file(&self, input: &Path) -> FileOutcome {
        match self.translate_file(input).await {
            Ok(outcome) => outcome,
            Err(e) => FileOutcome::Failed {
                input: input.to_path_buf(),
                reason: format!("{:#}", e),
            },
        }
    }

    /// The fallible body of the file pipeline: read, decompose, translate,
    /// reassemble, write
    async fn translate_file(&self, input: &Path) -> Result<FileOutcome> {
        let output = FileManager::map_output_path(
            input,
            &self.config.source_language,
            &self.config.target_language,
        )?;

        if FileManager::file_exists(&output) && !self.force_overwrite {
            return Ok(FileOutcome::Skipped {
                input: input.to_path_buf(),
                reason: "translation already exists (use -f to force overwrite)".to_string(),
            });
        }

        let content = FileManager::read_subtitle_text(input)?;
        if !content.is_empty() && !FileManager::looks_like_subtitle(&content) {
            warn!("{} does not look like a cue-block subtitle file, translating text lines anyway", input.display());
        }

        let document = SubtitleDocument::decompose(&content);
        debug!(
            "{}: {} lines, {} translatable",
            input.display(),
            document.lines.len(),
            document.translatable_count()
        );

        if document.translatable_count() == 0 {
            return Ok(FileOutcome::Skipped {
                input: input.to_path_buf(),
                reason: "no translatable content".to_string(),
            });
        }

        let outcome = self
            .service
            .translate_units(
                &document.units,
                &self.config.source_language,
                &self.config.target_language,
            )
            .await;

        for clip in &outcome.truncations {
            warn!(
                "{}: line at text position {} clipped from {} to {} chars before submission",
                input.display(),
                clip.text_position,
                clip.original_len,
                clip.truncated_len
            );
        }

        let rendered = document.reassemble(&outcome.texts)?;
        FileManager::write_to_file(&output, &rendered)?;

        Ok(FileOutcome::Processed {
            input: input.to_path_buf(),
            output,
            degraded_batches: outcome.degraded_batches,
        })
    }

    /// Translate every subtitle file under the folder convention
    /// `<root>/<item>/<source_lang>/*.srt`, with bounded concurrency.
    ///
    /// One file's failure never stops the others; every discovered file gets
    /// an outcome in the returned report.
    pub async fn run(&self, root: &Path) -> Result<RunReport> {
        if !FileManager::dir_exists(root) {
            return Err(anyhow::anyhow!("Input directory does not exist: {:?}", root));
        }

        let files = self.discover_files(root)?;
        if files.is_empty() {
            return Err(anyhow::anyhow!(
                "No '{}' subtitle files found under: {:?}",
                self.config.source_language,
                root
            ));
        }

        info!(
            "Translating {} file(s) {} -> {} via {}",
            files.len(),
            self.config.source_language,
            self.config.target_language,
            self.config.backend.provider.display_name()
        );

        // Probe the backend once up front; a failure here is only a warning,
        // per-file outcomes will carry the real errors
        self.service.test_connection().await;

        let folder_pb = ProgressBar::new(files.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));
        folder_pb.set_message("Processing files");

        let outcomes = stream::iter(files)
            .map(|file| {
                let pb = folder_pb.clone();
                async move {
                    let outcome = if self.cancel.is_cancelled() {
                        FileOutcome::Skipped {
                            input: file.clone(),
                            reason: "cancelled before start".to_string(),
                        }
                    } else {
                        self.process_file(&file).await
                    };

                    log_outcome(&outcome);
                    pb.inc(1);
                    outcome
                }
            })
            .buffer_unordered(self.config.concurrent_files)
            .collect::<Vec<_>>()
            .await;

        folder_pb.finish_and_clear();

        let report = RunReport { outcomes };
        info!("{}", report.summary());

        let log_path = root.join("subrelay.run.log");
        if let Err(e) = FileManager::append_to_log_file(&log_path, &report.summary()) {
            warn!("Failed to write run log: {}", e);
        }

        Ok(report)
    }

    /// Discover input files under the two-level folder convention and create
    /// the sibling target-language directories
    fn discover_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for item in FileManager::list_subdirs(root)? {
            let source_dir = item.join(&self.config.source_language);
            if !FileManager::dir_exists(&source_dir) {
                debug!("No {} folder in {:?}, skipping", self.config.source_language, item);
                continue;
            }

            FileManager::ensure_dir(item.join(&self.config.target_language))
                .with_context(|| format!("Failed to create target folder in {:?}", item))?;

            files.extend(FileManager::find_files(&source_dir, "srt")?);
        }

        Ok(files)
    }
}

/// Per-file outcome log line
fn log_outcome(outcome: &FileOutcome) {
    match outcome {
        FileOutcome::Processed { input, output, degraded_batches: 0 } => {
            info!("Translated {} -> {}", input.display(), output.display());
        }
        FileOutcome::Processed { input, output, degraded_batches } => {
            warn!(
                "Translated {} -> {} with {} degraded batch(es) left in the source language",
                input.display(),
                output.display(),
                degraded_batches
            );
        }
        FileOutcome::Skipped { input, reason } => {
            info!("Skipped {}: {}", input.display(), reason);
        }
        FileOutcome::Failed { input, reason } => {
            error!("Failed {}: {}", input.display(), reason);
        }
    }
}

/// Build the backend adapter named in the configuration
fn create_backend(config: &Config) -> Result<Arc<dyn TranslationBackend>> {
    let backend = &config.backend;
    match backend.provider {
        BackendProvider::Local => Ok(Arc::new(LocalServer::with_retry_policy(
            backend.endpoint.clone(),
            backend.retry_count,
            backend.retry_backoff_ms,
            backend.timeout_secs,
        ))),
        BackendProvider::Google => Ok(Arc::new(GoogleCloud::with_retry_policy(
            backend.access_token.clone(),
            &backend.project_id,
            GoogleCloud::DEFAULT_ENDPOINT,
            backend.retry_count,
            backend.retry_backoff_ms,
            backend.timeout_secs,
        ))),
    }
}
