use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::BackendError;
use crate::providers::{BackendRequest, BackendResponse, TranslationBackend};

/// Client for the Google Cloud Translation v3 REST API
#[derive(Debug)]
pub struct GoogleCloud {
    /// HTTP client for making requests
    client: Client,
    /// OAuth bearer token
    access_token: String,
    /// Resource parent, `projects/{project}/locations/{location}`
    parent: String,
    /// API root, overridable for tests
    endpoint: String,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
}

/// `translateText` request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TranslateTextRequest<'a> {
    contents: &'a [String],
    mime_type: &'a str,
    source_language_code: &'a str,
    target_language_code: &'a str,
}

/// One translation in a `translateText` response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
}

/// `translateText` response body
#[derive(Debug, Deserialize)]
struct TranslateTextResponse {
    #[serde(default)]
    translations: Vec<Translation>,
}

impl GoogleCloud {
    /// Default API root for the Cloud Translation service
    pub const DEFAULT_ENDPOINT: &'static str = "https://translation.googleapis.com";

    /// Create a new client for the given project
    pub fn new(access_token: impl Into<String>, project_id: &str) -> Self {
        Self::with_retry_policy(access_token, project_id, Self::DEFAULT_ENDPOINT, 3, 1000, 60)
    }

    /// Create a client with an explicit endpoint and retry policy
    pub fn with_retry_policy(
        access_token: impl Into<String>,
        project_id: &str,
        endpoint: impl Into<String>,
        max_retries: u32,
        backoff_base_ms: u64,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            access_token: access_token.into(),
            parent: format!("projects/{}/locations/global", project_id),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            max_retries,
            backoff_base_ms,
        }
    }

    /// Issue one `translateText` call without retry handling
    async fn post_translate(&self, request: &BackendRequest) -> Result<BackendResponse, BackendError> {
        let url = format!("{}/v3/{}:translateText", self.endpoint, self.parent);
        let body = TranslateTextRequest {
            contents: &request.contents,
            mime_type: "text/plain",
            source_language_code: &request.source_language,
            target_language_code: &request.target_language,
        };

        let response = self.client
            .post(&url)
            .bearer_auth(&self.access_token)
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
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                let message = response.text().await.unwrap_or_default();
                return Err(BackendError::AuthenticationError(message));
            }
            StatusCode::TOO_MANY_REQUESTS => {
                let message = response.text().await.unwrap_or_default();
                return Err(BackendError::RateLimitExceeded(message));
            }
            _ if !status.is_success() => {
                let message = response.text().await
                    .unwrap_or_else(|_| "Failed to get error response text".to_string());
                error!("Cloud Translation API error ({}): {}", status, message);
                return Err(BackendError::ApiError {
                    status_code: status.as_u16(),
                    message,
                });
            }
            _ => {}
        }

        let parsed = response.json::<TranslateTextResponse>().await
            .map_err(|e| BackendError::ParseError(e.to_string()))?;

        Ok(BackendResponse {
            translated: parsed.translations.into_iter().map(|t| t.translated_text).collect(),
        })
    }
}

#[async_trait]
impl TranslationBackend for GoogleCloud {
    fn name(&self) -> &str {
        "google-cloud"
    }

    async fn translate(&self, request: &BackendRequest) -> Result<BackendResponse, BackendError> {
        let mut attempt = 0;

        loop {
            match self.post_translate(request).await {
                Ok(response) => {
                    if response.translated.len() != request.contents.len() {
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
                        "Cloud Translation request failed (attempt {}/{}), retrying in {:?}: {}",
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
            target_language: "es".to_string(),
            contents: vec!["ping".to_string()],
        };
        self.post_translate(&probe).await.map(|_| ())
    }
}
