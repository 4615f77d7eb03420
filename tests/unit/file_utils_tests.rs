/*!
 * Tests for file and path utilities
 */

use std::fs;
use std::path::Path;
use subrelay::file_utils::FileManager;
use crate::common;

/// Test output path mapping by language segment substitution
#[test]
fn test_map_output_path_withLanguageSegment_shouldSubstitute() {
    let input = Path::new("library/show-one/zh_hans/episode01.srt");
    let output = FileManager::map_output_path(input, "zh_hans", "en").unwrap();
    assert_eq!(output, Path::new("library/show-one/en/episode01.srt"));
}

/// Test that mapping fails when no segment matches the source language
#[test]
fn test_map_output_path_withoutLanguageSegment_shouldError() {
    let input = Path::new("library/show-one/subs/episode01.srt");
    assert!(FileManager::map_output_path(input, "zh_hans", "en").is_err());
}

/// Test that the last matching segment is substituted
#[test]
fn test_map_output_path_withRepeatedSegment_shouldSubstituteLast() {
    let input = Path::new("zh/archive/zh/episode01.srt");
    let output = FileManager::map_output_path(input, "zh", "en").unwrap();
    assert_eq!(output, Path::new("zh/archive/en/episode01.srt"));
}

/// Test extension-filtered file listing
#[test]
fn test_find_files_withMixedDirectory_shouldFilterByExtension() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();

    common::create_test_file(&dir, "one.srt", "1\n").unwrap();
    common::create_test_file(&dir, "two.SRT", "2\n").unwrap();
    common::create_test_file(&dir, "notes.txt", "x\n").unwrap();

    let found = FileManager::find_files(&dir, "srt").unwrap();
    assert_eq!(found.len(), 2);

    let found = FileManager::find_files(&dir, ".srt").unwrap();
    assert_eq!(found.len(), 2);
}

/// Test that file discovery does not descend into nested folders
#[test]
fn test_find_files_withNestedFolder_shouldStayShallow() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();

    common::create_test_file(&dir, "top.srt", "1\n").unwrap();
    let nested = dir.join("nested");
    fs::create_dir_all(&nested).unwrap();
    common::create_test_file(&nested, "deep.srt", "2\n").unwrap();

    let found = FileManager::find_files(&dir, "srt").unwrap();
    assert_eq!(found.len(), 1);
}

/// Test subdirectory listing
#[test]
fn test_list_subdirs_withMixedEntries_shouldReturnDirsOnly() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();

    fs::create_dir_all(dir.join("show-a")).unwrap();
    fs::create_dir_all(dir.join("show-b")).unwrap();
    common::create_test_file(&dir, "loose.srt", "1\n").unwrap();

    let subdirs = FileManager::list_subdirs(&dir).unwrap();
    assert_eq!(subdirs.len(), 2);
    assert!(subdirs.iter().all(|d| d.is_dir()));
}

/// Test directory creation is idempotent
#[test]
fn test_ensure_dir_calledTwice_shouldSucceed() {
    let temp_dir = common::create_temp_dir().unwrap();
    let target = temp_dir.path().join("a/b/c");

    FileManager::ensure_dir(&target).unwrap();
    FileManager::ensure_dir(&target).unwrap();
    assert!(FileManager::dir_exists(&target));
}

/// Test reading UTF-8 content and rejecting undecodable bytes
#[test]
fn test_read_subtitle_text_withInvalidUtf8_shouldError() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();

    let good = common::create_test_file(&dir, "good.srt", "1\nhello\n").unwrap();
    assert_eq!(FileManager::read_subtitle_text(&good).unwrap(), "1\nhello\n");

    let bad = dir.join("bad.srt");
    fs::write(&bad, [0xff, 0xfe, 0x41]).unwrap();
    assert!(FileManager::read_subtitle_text(&bad).is_err());
}

/// Test the subtitle shape sniffer
#[test]
fn test_looks_like_subtitle_withCueBlock_shouldMatch() {
    assert!(FileManager::looks_like_subtitle(
        "1\n00:00:01,000 --> 00:00:02,000\nHello\n\n"
    ));
    assert!(!FileManager::looks_like_subtitle("just some text\n"));
    assert!(!FileManager::looks_like_subtitle("a --> b\n"));
}
