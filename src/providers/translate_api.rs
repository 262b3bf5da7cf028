use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use super::Provider;
use crate::errors::ProviderError;

/// Client for a single-string translate endpoint.
///
/// Speaks the Google web translate wire format: a GET request whose JSON
/// response is a nested array of translated sentence chunks. No API key,
/// but the service answers 429 quickly when an address draws attention, so
/// callers should keep batches large and requests few.
#[derive(Debug)]
pub struct TranslateApi {
    /// Base URL of the translate endpoint
    base_url: String,
    /// HTTP client for making requests
    client: Client,
}

/// Request for the translate endpoint
#[derive(Debug, Clone)]
pub struct TranslateRequest {
    /// Text to translate
    pub text: String,
    /// Source language code
    pub source_language: String,
    /// Target language code
    pub target_language: String,
    /// Per-request timeout budget
    pub timeout: Duration,
}

/// Response from the translate endpoint
#[derive(Debug, Clone)]
pub struct TranslateResponse {
    /// Translated text, sentence chunks already joined
    pub text: String,
}

impl TranslateApi {
    /// Create a new client from a complete base URL
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            base_url: url.into(),
            client: Client::builder()
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl Provider for TranslateApi {
    type Request = TranslateRequest;
    type Response = TranslateResponse;

    async fn complete(&self, request: TranslateRequest) -> Result<TranslateResponse, ProviderError> {
        let url = format!("{}/translate_a/single", self.base_url);
        let timeout = request.timeout;

        let response = self
            .client
            .get(&url)
            .timeout(timeout)
            // The public endpoint rejects requests without a browser agent
            .header("User-Agent", "Mozilla/5.0")
            .query(&[
                ("client", "gtx"),
                ("sl", request.source_language.as_str()),
                ("tl", request.target_language.as_str()),
                ("dt", "t"),
                ("q", request.text.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(timeout.as_secs())
                } else {
                    ProviderError::ConnectionError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Translate API error ({}): {}", status, message);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        let value: Value = serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(500).collect();
            error!(
                "Failed to parse translate API response: {}. Raw response (first 500 chars): {}",
                e, preview
            );
            ProviderError::ParseError(e.to_string())
        })?;

        // Response shape: [[["chunk", "source", ...], ...], ...]
        let chunks = value
            .get(0)
            .and_then(|v| v.as_array())
            .ok_or_else(|| {
                ProviderError::ParseError("Unexpected translate API response shape".to_string())
            })?;

        let mut translated = String::new();
        for chunk in chunks {
            if let Some(part) = chunk.get(0).and_then(|p| p.as_str()) {
                translated.push_str(part);
            }
        }

        if translated.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        Ok(TranslateResponse { text: translated })
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        // A minimal real translation doubles as the connectivity probe; the
        // endpoint has no health route
        let request = TranslateRequest {
            text: "Hello".to_string(),
            source_language: "en".to_string(),
            target_language: "es".to_string(),
            timeout: Duration::from_secs(10),
        };
        self.complete(request).await.map(|_| ())
    }

    fn extract_text(response: &TranslateResponse) -> String {
        response.text.trim().to_string()
    }
}
