/*!
 * Tests for backend adapter behavior
 */

use subrelay::errors::BackendError;
use subrelay::providers::mock::MockBackend;
use subrelay::providers::{BackendRequest, TranslationBackend};

fn request(contents: &[&str]) -> BackendRequest {
    BackendRequest {
        source_language: "zh".to_string(),
        target_language: "en".to_string(),
        contents: contents.iter().map(|c| c.to_string()).collect(),
    }
}

/// Test that a working backend preserves order and length
#[tokio::test]
async fn test_translate_withWorkingBackend_shouldPreserveOrder() {
    let backend = MockBackend::working().with_table(vec![("你好", "Hello"), ("世界", "World")]);

    let response = backend.translate(&request(&["你好", "世界"])).await.unwrap();
    assert_eq!(response.translated, vec!["Hello", "World"]);
}

/// Test that repeated lines are translated independently, never coalesced
#[tokio::test]
async fn test_translate_withRepeatedLines_shouldKeepEveryOccurrence() {
    let backend = MockBackend::working().with_table(vec![("好", "Good")]);

    let response = backend.translate(&request(&["好", "好", "好"])).await.unwrap();
    assert_eq!(response.translated, vec!["Good", "Good", "Good"]);
}

/// Test that a failing backend reports an error for the whole batch
#[tokio::test]
async fn test_translate_withFailingBackend_shouldError() {
    let backend = MockBackend::failing();

    let result = backend.translate(&request(&["anything"])).await;
    assert!(matches!(result, Err(BackendError::RequestFailed(_))));
    assert!(backend.test_connection().await.is_err());
}

/// Test intermittent failures hit every nth request
#[tokio::test]
async fn test_translate_withIntermittentBackend_shouldFailEverySecondRequest() {
    let backend = MockBackend::intermittent(2);

    assert!(backend.translate(&request(&["one"])).await.is_ok());
    assert!(backend.translate(&request(&["two"])).await.is_err());
    assert!(backend.translate(&request(&["three"])).await.is_ok());
    assert!(backend.translate(&request(&["four"])).await.is_err());
}

/// Test that the failure trigger poisons only matching requests
#[tokio::test]
async fn test_translate_withFailureTrigger_shouldFailOnlyMatchingBatches() {
    let backend = MockBackend::working().with_failure_trigger("poison");

    assert!(backend.translate(&request(&["clean line"])).await.is_ok());
    assert!(backend.translate(&request(&["a poison line"])).await.is_err());
    assert!(backend.translate(&request(&["clean again"])).await.is_ok());
}

/// Test that the call log records every request in order
#[tokio::test]
async fn test_call_log_withSeveralRequests_shouldRecordAll() {
    let backend = MockBackend::working();

    backend.translate(&request(&["first"])).await.unwrap();
    backend.translate(&request(&["second", "third"])).await.unwrap();

    assert_eq!(backend.request_count(), 2);
    let calls = backend.calls();
    assert_eq!(calls[0].contents, vec!["first"]);
    assert_eq!(calls[1].contents, vec!["second", "third"]);
    assert!(backend.was_submitted("third"));
    assert!(!backend.was_submitted("missing"));
}

/// Test that a length-mismatching backend is detectable by callers
#[tokio::test]
async fn test_translate_withLengthMismatchBackend_shouldReturnShortResponse() {
    let backend = MockBackend::length_mismatch();

    let response = backend.translate(&request(&["one", "two"])).await.unwrap();
    assert_eq!(response.translated.len(), 1);
}

/// Test that untabled strings get a deterministic target-language tag
#[tokio::test]
async fn test_translate_withNoTableEntry_shouldTagInput() {
    let backend = MockBackend::working();

    let response = backend.translate(&request(&["plain"])).await.unwrap();
    assert_eq!(response.translated, vec!["[en] plain"]);
}
