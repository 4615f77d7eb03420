/*!
 * Common test utilities for the subrelay test suite
 */

use std::fs;
use std::path::PathBuf;
use anyhow::Result;
use tempfile::TempDir;

use subrelay::app_config::{BatchConfig, Config};

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Two-cue sample used across pipeline tests
pub const SAMPLE_SRT: &str =
    "1\n00:00:01,000 --> 00:00:02,000\n你好\n\n2\n00:00:03,000 --> 00:00:04,000\n世界\n\n";

/// Creates `<root>/<item>/<lang>/<filename>` with the given content and
/// returns the file path
pub fn create_library_file(
    root: &PathBuf,
    item: &str,
    lang: &str,
    filename: &str,
    content: &str,
) -> Result<PathBuf> {
    let dir = root.join(item).join(lang);
    fs::create_dir_all(&dir)?;
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Default test configuration: zh -> en, one unit per batch
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.source_language = "zh".to_string();
    config.target_language = "en".to_string();
    config.batch = BatchConfig {
        max_entries: 1,
        max_chars: None,
        max_item_chars: None,
    };
    config
}
