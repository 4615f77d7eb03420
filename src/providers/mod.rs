/*!
 * Backend adapter implementations for translation services.
 *
 * This module contains client implementations for the supported backends:
 * - LocalServer: self-hosted inference server speaking a small JSON protocol
 * - GoogleCloud: Google Cloud Translation v3 REST API
 * - Mock: scripted backend for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::BackendError;

/// One translation request: an ordered list of strings and a language pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendRequest {
    /// Source language code (ISO)
    pub source_language: String,

    /// Target language code (ISO)
    pub target_language: String,

    /// Ordered strings to translate. Repeated strings must be translated
    /// independently; subtitle repetition is meaningful.
    pub contents: Vec<String>,
}

/// One translation response, same length and order as the request
#[derive(Debug, Clone)]
pub struct BackendResponse {
    /// Translated strings in request order
    pub translated: Vec<String>,
}

/// Common trait for all translation backends
///
/// An adapter must preserve order and must not coalesce or deduplicate
/// distinct input strings. A backend that partially fails internally is the
/// adapter's responsibility to surface as a whole-request error; partial
/// results are never returned.
#[async_trait]
pub trait TranslationBackend: Send + Sync + Debug {
    /// Short backend name for logs
    fn name(&self) -> &str;

    /// Translate an ordered batch of strings
    ///
    /// # Arguments
    /// * `request` - The batch to translate
    ///
    /// # Returns
    /// * `Result<BackendResponse, BackendError>` - Translations in request order, or an error
    async fn translate(&self, request: &BackendRequest) -> Result<BackendResponse, BackendError>;

    /// Test the connection to the backend
    ///
    /// # Returns
    /// * `Result<(), BackendError>` - Ok if the backend is reachable, or an error
    async fn test_connection(&self) -> Result<(), BackendError>;
}

pub mod google;
pub mod local_server;
pub mod mock;
