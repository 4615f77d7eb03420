/*!
 * Batch planning for translation requests.
 *
 * Splits the ordered sequence of translatable units into size-bounded batches
 * suitable for one backend call each, without ever dropping or reordering a
 * unit. Oversized units are isolated and, when the backend enforces a hard
 * per-item ceiling, truncated with a record of the cut.
 */

use log::{debug, error};

use crate::subtitle_processor::TranslatableUnit;

/// A contiguous slice of the translatable unit sequence
#[derive(Debug, Clone)]
pub struct TranslationBatch {
    /// 0-based batch number, in submission order
    pub index: usize,

    /// Units covered by this batch, in file order
    pub units: Vec<TranslatableUnit>,
}

impl TranslationBatch {
    /// The strings actually sent to the backend.
    ///
    /// Units that trimmed to nothing are carried by the batch for positional
    /// bookkeeping but excluded from the payload: a whitespace-only string is
    /// never submitted for translation.
    pub fn payload(&self) -> Vec<String> {
        self.units
            .iter()
            .filter(|u| !u.empty_after_trim)
            .map(|u| u.source_text.clone())
            .collect()
    }
}

/// Record of a unit clipped to the backend's per-item length ceiling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruncationRecord {
    /// `text_position` of the clipped unit
    pub text_position: usize,

    /// Character length before clipping
    pub original_len: usize,

    /// Character length after clipping
    pub truncated_len: usize,
}

/// The full batch plan for one file
#[derive(Debug)]
pub struct BatchPlan {
    /// Batches in submission order
    pub batches: Vec<TranslationBatch>,

    /// Units that were clipped to the per-item ceiling
    pub truncations: Vec<TruncationRecord>,
}

impl BatchPlan {
    /// Total units across all batches
    pub fn unit_count(&self) -> usize {
        self.batches.iter().map(|b| b.units.len()).sum()
    }
}

/// Split units into batches bounded by entry count and cumulative characters.
///
/// A batch closes when appending the next unit would exceed `max_entries`
/// units or push the cumulative trimmed length over `max_chars`. A single
/// unit longer than `max_chars` goes alone in its own batch, clipped to
/// `max_item_chars` when that ceiling is set.
///
/// Concatenating all batches' units in order reproduces the input sequence
/// exactly, for any `max_entries >= 1`.
pub fn plan_batches(
    units: &[TranslatableUnit],
    max_entries: usize,
    max_chars: Option<usize>,
    max_item_chars: Option<usize>,
) -> BatchPlan {
    let max_entries = max_entries.max(1);
    let total_units = units.len();

    let mut batches: Vec<TranslationBatch> = Vec::new();
    let mut truncations = Vec::new();
    let mut current: Vec<TranslatableUnit> = Vec::with_capacity(max_entries);
    let mut current_chars = 0;

    let close_current = |current: &mut Vec<TranslatableUnit>, batches: &mut Vec<TranslationBatch>| {
        if !current.is_empty() {
            batches.push(TranslationBatch {
                index: batches.len(),
                units: std::mem::take(current),
            });
        }
    };

    for unit in units {
        let unit_chars = unit.char_len();

        // An oversized unit gets its own batch, never dropped
        if max_chars.is_some_and(|limit| unit_chars > limit) {
            close_current(&mut current, &mut batches);
            current_chars = 0;

            let isolated = match max_item_chars {
                Some(ceiling) if unit_chars > ceiling => {
                    debug!(
                        "Unit at text position {} is oversized ({} chars), clipping to {}",
                        unit.text_position, unit_chars, ceiling
                    );
                    truncations.push(TruncationRecord {
                        text_position: unit.text_position,
                        original_len: unit_chars,
                        truncated_len: ceiling,
                    });
                    TranslatableUnit {
                        source_text: unit.source_text.chars().take(ceiling).collect(),
                        ..unit.clone()
                    }
                }
                _ => {
                    debug!(
                        "Unit at text position {} is oversized ({} chars), placing in its own batch",
                        unit.text_position, unit_chars
                    );
                    unit.clone()
                }
            };

            batches.push(TranslationBatch {
                index: batches.len(),
                units: vec![isolated],
            });
            continue;
        }

        if !current.is_empty()
            && (current.len() >= max_entries
                || max_chars.is_some_and(|limit| current_chars + unit_chars > limit))
        {
            close_current(&mut current, &mut batches);
            current_chars = 0;
        }

        current.push(unit.clone());
        current_chars += unit_chars;
    }

    close_current(&mut current, &mut batches);

    let plan = BatchPlan { batches, truncations };

    // The batcher must account for every unit exactly once
    if plan.unit_count() != total_units {
        error!(
            "Lost units during batching! Original: {}, after batching: {}",
            total_units,
            plan.unit_count()
        );
    }

    plan
}
