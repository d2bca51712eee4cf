// SPDX-FileCopyrightText: 2026 Moodwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the hosted inference API.
//!
//! Handles request construction, bearer authentication, and transient
//! error retry. Each model invocation is a single POST to
//! `{base_url}/models/{model_id}`.

use std::time::Duration;

use moodwire_config::model::InferenceConfig;
use moodwire_core::{AnalysisStageKind, MoodwireError};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::types::{ApiErrorBody, InferenceRequest};

/// HTTP client for hosted model invocations.
///
/// Retries once after a 1-second delay on transient statuses (429, 500,
/// 503); 503 is common while a cold model loads.
#[derive(Debug, Clone)]
pub struct InferenceClient {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
}

impl InferenceClient {
    /// Creates a client from the inference configuration.
    pub fn new(config: &InferenceConfig) -> Result<Self, MoodwireError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = config.api_token.as_deref() {
            let value = format!("Bearer {token}");
            headers.insert(
                "authorization",
                HeaderValue::from_str(&value).map_err(|e| {
                    MoodwireError::Config(format!("invalid inference API token: {e}"))
                })?,
            );
        }
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MoodwireError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            max_retries: 1,
        })
    }

    /// Invokes one model and deserializes its JSON response.
    pub async fn infer<T: DeserializeOwned>(
        &self,
        model: &str,
        request: &InferenceRequest<'_>,
        stage: AnalysisStageKind,
    ) -> Result<T, MoodwireError> {
        let url = format!("{}/models/{}", self.base_url, model);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(%stage, attempt, "retrying inference request after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .post(&url)
                .json(request)
                .send()
                .await
                .map_err(|e| MoodwireError::Analysis {
                    stage,
                    message: format!("HTTP request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(%stage, status = %status, attempt, "inference response received");

            if status.is_success() {
                return response.json::<T>().await.map_err(|e| MoodwireError::Analysis {
                    stage,
                    message: format!("malformed inference response: {e}"),
                    source: Some(Box::new(e)),
                });
            }

            let body = response.text().await.unwrap_or_default();
            let detail = match serde_json::from_str::<ApiErrorBody>(&body) {
                Ok(api_err) => api_err.error,
                Err(_) => format!("API returned {status}: {body}"),
            };

            if is_transient(status) && attempt < self.max_retries {
                warn!(%stage, status = %status, detail = detail.as_str(), "transient error, will retry");
                last_error = Some(MoodwireError::analysis(stage, detail));
                continue;
            }

            return Err(MoodwireError::analysis(stage, detail));
        }

        Err(last_error
            .unwrap_or_else(|| MoodwireError::analysis(stage, "inference request failed after retries")))
    }
}

fn is_transient(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_statuses() {
        assert!(is_transient(reqwest::StatusCode::TOO_MANY_REQUESTS));
        assert!(is_transient(reqwest::StatusCode::INTERNAL_SERVER_ERROR));
        assert!(is_transient(reqwest::StatusCode::SERVICE_UNAVAILABLE));
        assert!(!is_transient(reqwest::StatusCode::UNAUTHORIZED));
        assert!(!is_transient(reqwest::StatusCode::NOT_FOUND));
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let mut config = InferenceConfig::default();
        config.endpoint = "https://example.test/".to_string();
        let client = InferenceClient::new(&config).unwrap();
        assert_eq!(client.base_url, "https://example.test");
    }
}
