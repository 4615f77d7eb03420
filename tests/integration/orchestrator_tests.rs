/*!
 * Tests for the folder run: discovery, bounded concurrency, failure
 * isolation and cancellation
 */

use std::fs;
use std::sync::Arc;

use subrelay::app_controller::{Controller, FileOutcome};
use subrelay::providers::mock::MockBackend;
use crate::common;

fn cue(index: usize, text: &str) -> String {
    format!(
        "{}\n00:00:{:02},000 --> 00:00:{:02},500\n{}\n\n",
        index, index, index, text
    )
}

/// Test a 10-file run where one file's backend calls always fail:
/// every file gets an outcome, exactly one degrades, the rest translate
#[tokio::test]
async fn test_run_withOneBadFile_shouldIsolateItsFailure() {
    let temp_dir = common::create_temp_dir().unwrap();
    let root = temp_dir.path().to_path_buf();

    for show in 1..=5 {
        for episode in 1..=2 {
            let text = if show == 3 && episode == 1 {
                "BADLINE 翻译不了".to_string()
            } else {
                format!("第{}集台词", episode)
            };
            common::create_library_file(
                &root,
                &format!("show-{}", show),
                "zh",
                &format!("ep{}.srt", episode),
                &cue(1, &text),
            )
            .unwrap();
        }
    }

    let mut config = common::test_config();
    config.concurrent_files = 3;

    let mock = Arc::new(MockBackend::working().with_failure_trigger("BADLINE"));
    let controller = Controller::with_backend(config, mock);

    let report = controller.run(&root).await.unwrap();

    assert_eq!(report.outcomes.len(), 10);
    assert_eq!(report.processed_clean(), 9);
    assert_eq!(report.processed_partial(), 1);
    assert_eq!(report.skipped(), 0);
    assert_eq!(report.failed(), 0);
    assert!(!report.has_failures());

    // The degraded outcome belongs to the poisoned file
    let partial = report
        .outcomes
        .iter()
        .find(|o| o.is_partial())
        .expect("one partial outcome");
    assert!(partial.input().ends_with("show-3/zh/ep1.srt"));

    // Every file produced output, the poisoned one as passthrough
    for show in 1..=5 {
        for episode in 1..=2 {
            let output = root
                .join(format!("show-{}", show))
                .join("en")
                .join(format!("ep{}.srt", episode));
            assert!(output.is_file(), "missing output: {:?}", output);
        }
    }
    let degraded = fs::read_to_string(root.join("show-3/en/ep1.srt")).unwrap();
    assert!(degraded.contains("BADLINE 翻译不了"));
}

/// Test discovery under the two-level convention: items without a source
/// folder are ignored, target folders are created
#[tokio::test]
async fn test_run_withMixedItems_shouldDiscoverOnlyConvention() {
    let temp_dir = common::create_temp_dir().unwrap();
    let root = temp_dir.path().to_path_buf();

    common::create_library_file(&root, "show-a", "zh", "ep1.srt", &cue(1, "你好")).unwrap();
    // An item with no source-language folder
    fs::create_dir_all(root.join("show-b").join("de")).unwrap();
    // A non-subtitle file in a source folder
    common::create_library_file(&root, "show-a", "zh", "notes.txt", "notes").unwrap();

    let mock = Arc::new(MockBackend::working());
    let controller = Controller::with_backend(common::test_config(), mock);

    let report = controller.run(&root).await.unwrap();
    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(report.processed_clean(), 1);

    assert!(root.join("show-a/en").is_dir());
    assert!(!root.join("show-b/en").exists());
}

/// Test that a run with nothing to discover is an error, not an empty report
#[tokio::test]
async fn test_run_withNoFiles_shouldError() {
    let temp_dir = common::create_temp_dir().unwrap();
    let root = temp_dir.path().to_path_buf();
    fs::create_dir_all(root.join("empty-show")).unwrap();

    let mock = Arc::new(MockBackend::working());
    let controller = Controller::with_backend(common::test_config(), mock);

    assert!(controller.run(&root).await.is_err());
    assert!(controller.run(&root.join("missing")).await.is_err());
}

/// Test that file failures surface in the report without stopping the run
#[tokio::test]
async fn test_run_withUndecodableFile_shouldReportFailureAndContinue() {
    let temp_dir = common::create_temp_dir().unwrap();
    let root = temp_dir.path().to_path_buf();

    common::create_library_file(&root, "show", "zh", "good.srt", &cue(1, "你好")).unwrap();
    let bad_dir = root.join("show").join("zh");
    fs::write(bad_dir.join("bad.srt"), [0xff, 0xfe]).unwrap();

    let mock = Arc::new(MockBackend::working());
    let controller = Controller::with_backend(common::test_config(), mock);

    let report = controller.run(&root).await.unwrap();
    assert_eq!(report.outcomes.len(), 2);
    assert_eq!(report.processed_clean(), 1);
    assert_eq!(report.failed(), 1);
    assert!(report.has_failures());
}

/// Test that cancellation prevents not-yet-started files from running
#[tokio::test]
async fn test_run_withCancelledFlag_shouldSkipEverything() {
    let temp_dir = common::create_temp_dir().unwrap();
    let root = temp_dir.path().to_path_buf();

    for episode in 1..=4 {
        common::create_library_file(
            &root,
            "show",
            "zh",
            &format!("ep{}.srt", episode),
            &cue(1, "台词"),
        )
        .unwrap();
    }

    let mock = Arc::new(MockBackend::working());
    let controller = Controller::with_backend(common::test_config(), mock.clone());

    controller.cancel_handle().cancel();
    let report = controller.run(&root).await.unwrap();

    assert_eq!(report.outcomes.len(), 4);
    assert_eq!(report.skipped(), 4);
    for outcome in &report.outcomes {
        match outcome {
            FileOutcome::Skipped { reason, .. } => assert!(reason.contains("cancelled")),
            other => panic!("Expected Skipped, got {:?}", other),
        }
    }

    // Nothing was submitted and nothing was written
    assert_eq!(mock.request_count(), 0);
    let outputs = fs::read_dir(root.join("show/en")).unwrap().count();
    assert_eq!(outputs, 0);
}

/// Test that a slow backend with bounded concurrency still completes cleanly
#[tokio::test]
async fn test_run_withSlowBackend_shouldCompleteAllFiles() {
    let temp_dir = common::create_temp_dir().unwrap();
    let root = temp_dir.path().to_path_buf();

    for episode in 1..=6 {
        common::create_library_file(
            &root,
            "show",
            "zh",
            &format!("ep{}.srt", episode),
            &cue(1, "台词"),
        )
        .unwrap();
    }

    let mut config = common::test_config();
    config.concurrent_files = 3;

    let mock = Arc::new(MockBackend::slow(10));
    let controller = Controller::with_backend(config, mock);

    let report = controller.run(&root).await.unwrap();
    assert_eq!(report.outcomes.len(), 6);
    assert_eq!(report.processed_clean(), 6);
    assert_eq!(
        report.summary(),
        "Run completed: 6 translated, 0 partial, 0 skipped, 0 failed"
    );
}
