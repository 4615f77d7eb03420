/*!
 * Mock backend for testing.
 *
 * Simulates backend behaviors without network access:
 * - `MockBackend::working()` - tags every input string as translated
 * - `MockBackend::with_table(..)` - table-driven translations
 * - `MockBackend::failing()` - always fails
 * - `MockBackend::intermittent(n)` - fails every nth request
 * - `MockBackend::length_mismatch()` - drops one string from each response
 *
 * Every request is recorded in a call log so tests can assert exactly which
 * strings were (and were not) submitted.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::errors::BackendError;
use crate::providers::{BackendRequest, BackendResponse, TranslationBackend};

/// Behavior mode for the mock backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a proper translation
    Working,
    /// Fails intermittently (every nth request)
    Intermittent {
        /// Every nth request fails, 1-based
        fail_every: usize
    },
    /// Always fails with an error
    Failing,
    /// Returns one fewer translation than requested
    LengthMismatch,
    /// Delays each response (for cancellation and concurrency tests)
    Slow {
        /// Delay per request in milliseconds
        delay_ms: u64
    },
}

/// Mock translation backend
#[derive(Debug)]
pub struct MockBackend {
    /// Behavior mode
    behavior: MockBehavior,
    /// Fixed translations; inputs not in the table get a `[xx]` tag prefix
    table: HashMap<String, String>,
    /// Any request containing this string fails, regardless of behavior
    fail_trigger: Option<String>,
    /// Request counter for intermittent failures
    request_count: AtomicUsize,
    /// Every request this backend has received, in order
    call_log: Arc<Mutex<Vec<BackendRequest>>>,
}

impl MockBackend {
    /// Create a new mock backend with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            table: HashMap::new(),
            fail_trigger: None,
            request_count: AtomicUsize::new(0),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a working mock backend that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a failing mock backend that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create an intermittently failing mock backend
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// Create a mock that breaks the same-length contract
    pub fn length_mismatch() -> Self {
        Self::new(MockBehavior::LengthMismatch)
    }

    /// Create a mock that sleeps before answering
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Fail every request whose contents include the given string.
    ///
    /// Lets a test poison exactly one file in a multi-file run while the
    /// backend keeps working for everything else.
    pub fn with_failure_trigger(mut self, trigger: impl Into<String>) -> Self {
        self.fail_trigger = Some(trigger.into());
        self
    }

    /// Add fixed translations to the lookup table
    pub fn with_table<I, S>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        self.table
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Snapshot of every request received so far
    pub fn calls(&self) -> Vec<BackendRequest> {
        self.call_log.lock().clone()
    }

    /// Whether any received request contained the given string
    pub fn was_submitted(&self, text: &str) -> bool {
        self.call_log
            .lock()
            .iter()
            .any(|req| req.contents.iter().any(|c| c == text))
    }

    /// Number of requests received
    pub fn request_count(&self) -> usize {
        self.call_log.lock().len()
    }

    fn render(&self, request: &BackendRequest, text: &str) -> String {
        match self.table.get(text) {
            Some(translated) => translated.clone(),
            None => format!("[{}] {}", request.target_language, text),
        }
    }
}

#[async_trait]
impl TranslationBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn translate(&self, request: &BackendRequest) -> Result<BackendResponse, BackendError> {
        self.call_log.lock().push(request.clone());
        let count = self.request_count.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(trigger) = &self.fail_trigger {
            if request.contents.iter().any(|c| c.contains(trigger.as_str())) {
                return Err(BackendError::RequestFailed(format!(
                    "mock failure trigger '{}' matched",
                    trigger
                )));
            }
        }

        match self.behavior {
            MockBehavior::Failing => {
                Err(BackendError::RequestFailed("mock backend configured to fail".to_string()))
            }
            MockBehavior::Intermittent { fail_every } if fail_every > 0 && count % fail_every == 0 => {
                Err(BackendError::ConnectionError(format!("mock failure on request {}", count)))
            }
            MockBehavior::LengthMismatch => {
                let mut translated: Vec<String> = request
                    .contents
                    .iter()
                    .map(|c| self.render(request, c))
                    .collect();
                translated.pop();
                Ok(BackendResponse { translated })
            }
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                Ok(BackendResponse {
                    translated: request.contents.iter().map(|c| self.render(request, c)).collect(),
                })
            }
            _ => Ok(BackendResponse {
                translated: request.contents.iter().map(|c| self.render(request, c)).collect(),
            }),
        }
    }

    async fn test_connection(&self) -> Result<(), BackendError> {
        match self.behavior {
            MockBehavior::Failing => {
                Err(BackendError::ConnectionError("mock backend configured to fail".to_string()))
            }
            _ => Ok(()),
        }
    }
}
