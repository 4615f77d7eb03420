use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;
use url::Url;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO)
    pub source_language: String,

    /// Target language code (ISO)
    pub target_language: String,

    /// Translation backend config
    pub backend: BackendConfig,

    /// Batch sizing config
    #[serde(default)]
    pub batch: BatchConfig,

    /// Max files translated concurrently
    #[serde(default = "default_concurrent_files")]
    pub concurrent_files: usize,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation backend type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendProvider {
    // @provider: Self-hosted inference server
    #[default]
    Local,
    // @provider: Google Cloud Translation v3
    Google,
}

impl BackendProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Local => "Local server",
            Self::Google => "Google Cloud Translation",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Local => "local".to_string(),
            Self::Google => "google".to_string(),
        }
    }
}

impl std::fmt::Display for BackendProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for BackendProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "google" => Ok(Self::Google),
            _ => Err(anyhow!("Invalid backend type: {}", s)),
        }
    }
}

/// Translation backend configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BackendConfig {
    // @field: Backend type identifier
    #[serde(rename = "type", default)]
    pub provider: BackendProvider,

    // @field: Service URL (local backend)
    #[serde(default = "default_local_endpoint")]
    pub endpoint: String,

    // @field: OAuth bearer token (cloud backend)
    #[serde(default = "String::new")]
    pub access_token: String,

    // @field: Cloud project identifier (cloud backend)
    #[serde(default = "String::new")]
    pub project_id: String,

    // @field: Request timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Bounded retry attempts per batch
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    // @field: Base backoff in ms, doubled on each retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            provider: BackendProvider::default(),
            endpoint: default_local_endpoint(),
            access_token: String::new(),
            project_id: String::new(),
            timeout_secs: default_timeout_secs(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// Batch sizing configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BatchConfig {
    /// Maximum units per backend call
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Maximum cumulative characters per backend call
    #[serde(default = "default_max_chars")]
    pub max_chars: Option<usize>,

    /// Hard per-item character ceiling enforced by the backend
    #[serde(default = "default_max_item_chars")]
    pub max_item_chars: Option<usize>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            max_chars: default_max_chars(),
            max_item_chars: default_max_item_chars(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_concurrent_files() -> usize {
    4
}

fn default_max_entries() -> usize {
    100
}

fn default_max_chars() -> Option<usize> {
    Some(4000)
}

// The local inference server truncates inputs at 512 tokens; clipping at the
// same character count keeps request and response aligned.
fn default_max_item_chars() -> Option<usize> {
    Some(512)
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_local_endpoint() -> String {
    "http://127.0.0.1:5000".to_string()
}

impl Config {
    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate languages
        let _source_name = crate::language_utils::get_language_name(&self.source_language)?;
        let _target_name = crate::language_utils::get_language_name(&self.target_language)?;

        if crate::language_utils::language_codes_match(&self.source_language, &self.target_language) {
            return Err(anyhow!(
                "Source and target language are the same: {}",
                self.source_language
            ));
        }

        if self.batch.max_entries == 0 {
            return Err(anyhow!("batch.max_entries must be at least 1"));
        }

        if self.concurrent_files == 0 {
            return Err(anyhow!("concurrent_files must be at least 1"));
        }

        // Validate backend-specific requirements
        match self.backend.provider {
            BackendProvider::Local => {
                Url::parse(&self.backend.endpoint)
                    .with_context(|| format!("Invalid backend endpoint: {}", self.backend.endpoint))?;
            }
            BackendProvider::Google => {
                if self.backend.project_id.is_empty() {
                    return Err(anyhow!("A project id is required for the Google backend"));
                }
                if self.backend.access_token.is_empty() {
                    return Err(anyhow!("An access token is required for the Google backend"));
                }
            }
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: "zh".to_string(),
            target_language: "en".to_string(),
            backend: BackendConfig::default(),
            batch: BatchConfig::default(),
            concurrent_files: default_concurrent_files(),
            log_level: LogLevel::default(),
        }
    }
}
