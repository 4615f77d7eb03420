use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::BackendError;
use crate::providers::{BackendRequest, BackendResponse, TranslationBackend};

/// Client for a self-hosted translation inference server.
///
/// The server exposes a single `POST /translate` route taking an ordered list
/// of strings and returning the translations in the same order.
#[derive(Debug)]
pub struct LocalServer {
    /// Base URL of the translation server
    base_url: String,
    /// HTTP client for making requests
    client: Client,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
}

/// Request body for the `/translate` route
#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    /// Source language code
    source_lang: &'a str,
    /// Target language code
    target_lang: &'a str,
    /// Ordered strings to translate
    contents: &'a [String],
}

/// Response body from the `/translate` route
#[derive(Debug, Deserialize)]
struct TranslateResponse {
    /// Translated strings in request order
    translated: Vec<String>,
}

impl LocalServer {
    /// Create a new client for the given endpoint
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_retry_policy(endpoint, 3, 1000, 30)
    }

    /// Create a client with an explicit retry policy and timeout.
    ///
    /// Uses connection pooling for better performance with concurrent
    /// requests; the server speaks HTTP/1.1.
    pub fn with_retry_policy(
        endpoint: impl Into<String>,
        max_retries: u32,
        backoff_base_ms: u64,
        timeout_secs: u64,
    ) -> Self {
        let endpoint = endpoint.into();
        let base_url = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", endpoint.trim_end_matches('/'))
        };

        Self {
            base_url,
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .http1_only()
                .pool_idle_timeout(Duration::from_secs(90))
                .tcp_keepalive(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            max_retries,
            backoff_base_ms,
        }
    }

    /// Issue one request without retry handling
    async fn post_translate(&self, request: &BackendRequest) -> Result<BackendResponse, BackendError> {
        let url = format!("{}/translate", self.base_url);
        let body = TranslateRequest {
            source_lang: &request.source_language,
            target_lang: &request.target_language,
            contents: &request.contents,
        };

        let response = self.client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    BackendError::ConnectionError(e.to_string())
                } else {
                    BackendError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::RateLimitExceeded(message));
        }
        if !status.is_success() {
            let message = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Translation server error ({}): {}", status, message);
            return Err(BackendError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let parsed = response.json::<TranslateResponse>().await
            .map_err(|e| BackendError::ParseError(e.to_string()))?;

        Ok(BackendResponse { translated: parsed.translated })
    }
}

#[async_trait]
impl TranslationBackend for LocalServer {
    fn name(&self) -> &str {
        "local-server"
    }

    async fn translate(&self, request: &BackendRequest) -> Result<BackendResponse, BackendError> {
        let mut attempt = 0;

        loop {
            match self.post_translate(request).await {
                Ok(response) => {
                    if response.translated.len() != request.contents.len() {
                        // Not retryable: the server answered but broke the contract
                        return Err(BackendError::LengthMismatch {
                            sent: request.contents.len(),
                            got: response.translated.len(),
                        });
                    }
                    return Ok(response);
                }
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    let backoff = Duration::from_millis(self.backoff_base_ms * (1 << attempt));
                    debug!(
                        "Translation request failed (attempt {}/{}), retrying in {:?}: {}",
                        attempt + 1,
                        self.max_retries,
                        backoff,
                        e
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn test_connection(&self) -> Result<(), BackendError> {
        let probe = BackendRequest {
            source_language: "en".to_string(),
            target_language: "en".to_string(),
            contents: vec!["ping".to_string()],
        };
        self.post_translate(&probe).await.map(|_| ())
    }
}
