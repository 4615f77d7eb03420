/*!
 * Translation pipeline stages between decomposition and reassembly.
 *
 * - `batch`: size-bounded batch planning over translatable units
 * - `core`: sequential batch submission and per-unit result collection
 */

// Re-export main types for easier usage
pub use self::batch::{plan_batches, BatchPlan, TranslationBatch, TruncationRecord};
pub use self::core::{BatchTranslation, TranslationOutcome, TranslationService};

// Submodules
pub mod batch;
pub mod core;
