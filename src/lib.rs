/*!
 * # subrelay - batch subtitle translation
 *
 * A Rust library for translating folders of subtitle files through an
 * external translation backend while preserving the files' structure
 * line for line.
 *
 * ## Features
 *
 * - Decompose subtitle files into structural lines and translatable text
 * - Batch translatable lines under backend size limits
 * - Reassemble output that mirrors the input line for line
 * - Translate via pluggable backends:
 *   - Local inference server (self-hosted)
 *   - Google Cloud Translation v3
 * - Process whole folder trees with bounded concurrency
 * - Per-file failure isolation: one bad file never stops a run
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: Decomposition and reassembly of subtitle files
 * - `translation`: Batch planning and backend submission:
 *   - `translation::batch`: Size-bounded batch planning
 *   - `translation::core`: Sequential batch submission per file
 * - `file_utils`: File system operations and output-path mapping
 * - `app_controller`: File pipeline and folder orchestration
 * - `language_utils`: ISO language code utilities
 * - `providers`: Backend adapter implementations:
 *   - `providers::local_server`: Self-hosted inference server client
 *   - `providers::google`: Google Cloud Translation client
 *   - `providers::mock`: Scripted backend for tests
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod subtitle_processor;
pub mod translation;
pub mod app_controller;
pub mod language_utils;
pub mod providers;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{CancelFlag, Controller, FileOutcome, RunReport};
pub use subtitle_processor::{LineKind, StructuralLine, SubtitleDocument, TranslatableUnit};
pub use translation::TranslationService;
pub use language_utils::{get_language_name, language_codes_match};
pub use errors::{AppError, BackendError, SubtitleError};
