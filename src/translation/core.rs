/*!
 * Per-file translation driver.
 *
 * Plans batches for a file's translatable units, submits them to the backend
 * adapter one at a time, and collects the per-unit results. A failed batch is
 * data, not an error: its units come back as `None` so the reassembler can
 * degrade them to source-text passthrough instead of aborting the file.
 */

use std::sync::Arc;
use log::{debug, warn};

use crate::app_config::BatchConfig;
use crate::providers::{BackendRequest, TranslationBackend};
use crate::subtitle_processor::TranslatableUnit;
use crate::translation::batch::{plan_batches, TranslationBatch, TruncationRecord};

/// Result of one backend call, all-or-nothing from the caller's point of view
#[derive(Debug)]
pub enum BatchTranslation {
    /// Ordered translated strings, one per payload string
    Translated(Vec<String>),
    /// The whole batch failed; its units degrade to source text
    Failed(String),
}

/// Per-unit results for one file
#[derive(Debug)]
pub struct TranslationOutcome {
    /// Indexed by `text_position`; `None` marks units of failed batches
    pub texts: Vec<Option<String>>,

    /// Number of batches that failed and degraded to passthrough
    pub degraded_batches: usize,

    /// Number of batches submitted (including empty-payload batches resolved locally)
    pub total_batches: usize,

    /// Units clipped to the backend's per-item ceiling
    pub truncations: Vec<TruncationRecord>,
}

impl TranslationOutcome {
    /// True when at least one batch degraded to source-text passthrough
    pub fn is_partial(&self) -> bool {
        self.degraded_batches > 0
    }
}

/// Translation service driving one backend adapter
pub struct TranslationService {
    backend: Arc<dyn TranslationBackend>,
    batch_config: BatchConfig,
}

impl TranslationService {
    /// Create a service around a backend adapter
    pub fn new(backend: Arc<dyn TranslationBackend>, batch_config: BatchConfig) -> Self {
        Self { backend, batch_config }
    }

    /// Probe the backend once; failures are reported, not fatal
    pub async fn test_connection(&self) -> bool {
        match self.backend.test_connection().await {
            Ok(()) => true,
            Err(e) => {
                warn!("Backend connection test failed ({}): {}", self.backend.name(), e);
                false
            }
        }
    }

    /// Translate all units of one file.
    ///
    /// Batches are submitted sequentially; within a file the result is
    /// deterministic and independent of any outer concurrency. Every unit is
    /// accounted for in the returned outcome: translated, degraded (`None`),
    /// or resolved locally without a backend round trip (empty after trim).
    pub async fn translate_units(
        &self,
        units: &[TranslatableUnit],
        source_language: &str,
        target_language: &str,
    ) -> TranslationOutcome {
        let plan = plan_batches(
            units,
            self.batch_config.max_entries,
            self.batch_config.max_chars,
            self.batch_config.max_item_chars,
        );

        let total_batches = plan.batches.len();
        let mut texts: Vec<Option<String>> = vec![None; units.len()];
        let mut degraded_batches = 0;

        for batch in &plan.batches {
            match self.translate_batch(batch, source_language, target_language).await {
                BatchTranslation::Translated(translated) => {
                    let mut next = translated.into_iter();
                    for unit in &batch.units {
                        if unit.empty_after_trim {
                            continue;
                        }
                        // translate_batch guarantees one string per payload unit
                        texts[unit.text_position] = next.next();
                    }
                }
                BatchTranslation::Failed(reason) => {
                    warn!(
                        "Batch {}/{} failed, degrading {} unit(s) to source text: {}",
                        batch.index + 1,
                        total_batches,
                        batch.units.len(),
                        reason
                    );
                    degraded_batches += 1;
                }
            }
        }

        TranslationOutcome {
            texts,
            degraded_batches,
            total_batches,
            truncations: plan.truncations,
        }
    }

    /// Submit one batch, converting every failure mode into `Failed`.
    ///
    /// A batch whose payload is empty (all units trimmed to nothing) resolves
    /// locally without touching the backend.
    async fn translate_batch(
        &self,
        batch: &TranslationBatch,
        source_language: &str,
        target_language: &str,
    ) -> BatchTranslation {
        let payload = batch.payload();
        if payload.is_empty() {
            debug!("Batch {} has no submittable text, resolving locally", batch.index + 1);
            return BatchTranslation::Translated(Vec::new());
        }

        let sent = payload.len();
        let request = BackendRequest {
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
            contents: payload,
        };

        match self.backend.translate(&request).await {
            Ok(response) => {
                if response.translated.len() != sent {
                    return BatchTranslation::Failed(format!(
                        "backend returned {} translations for {} inputs",
                        response.translated.len(),
                        sent
                    ));
                }
                BatchTranslation::Translated(response.translated)
            }
            Err(e) => BatchTranslation::Failed(e.to_string()),
        }
    }
}
