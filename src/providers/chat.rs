use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::Provider;
use crate::errors::ProviderError;

/// Client for a conversational (chat completion) translation backend.
///
/// Speaks the Ollama `/api/chat` wire format. The instruction payload must
/// order the model to keep the batch delimiter verbatim and to skip any
/// explanatory preamble; models ignore the latter often enough that
/// [`strip_preamble`] exists.
#[derive(Debug)]
pub struct ChatApi {
    /// Base URL of the chat API
    base_url: String,
    /// HTTP client for making requests
    client: Client,
}

/// Chat message object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (system, user or assistant)
    pub role: String,
    /// Content of the message
    pub content: String,
}

/// Additional model parameters
#[derive(Debug, Serialize)]
struct ChatOptions {
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Chat request for the backend API
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    /// Model name to use for generation
    model: String,
    /// Messages of the conversation
    messages: Vec<ChatMessage>,
    /// Whether to stream the response
    stream: bool,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<ChatOptions>,
    /// Per-request timeout budget, not part of the wire format
    #[serde(skip)]
    timeout: Duration,
}

impl ChatRequest {
    /// Create a chat request carrying a system instruction and the payload
    pub fn new(
        model: impl Into<String>,
        system_prompt: impl Into<String>,
        user_content: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            model: model.into(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt.into(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_content.into(),
                },
            ],
            stream: false,
            options: None,
            timeout,
        }
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options = Some(ChatOptions {
            temperature: Some(temperature),
        });
        self
    }
}

/// Chat response from the backend API
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    /// Response message
    pub message: ChatMessage,
    /// Whether the generation is complete
    #[serde(default)]
    pub done: bool,
    /// Model name
    #[serde(default)]
    pub model: String,
    /// Number of generated tokens
    #[serde(default)]
    pub eval_count: Option<u64>,
}

impl ChatApi {
    /// Create a new client for the given host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self::from_url(format!("http://{}:{}", host.into(), port))
    }

    /// Create a new client from a complete base URL
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            base_url: url.into(),
            client: Client::builder()
                // The chat server speaks HTTP/1.1; keep connections warm
                // across sequential batch requests
                .http1_only()
                .pool_idle_timeout(Duration::from_secs(90))
                .tcp_keepalive(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl Provider for ChatApi {
    type Request = ChatRequest;
    type Response = ChatResponse;

    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let url = format!("{}/api/chat", self.base_url);
        let timeout = request.timeout;

        let response = self
            .client
            .post(&url)
            .timeout(timeout)
            .json(&request)
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
            error!("Chat API error ({}): {}", status, message);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(500).collect();
            error!(
                "Failed to parse chat API response: {}. Raw response (first 500 chars): {}",
                e, preview
            );
            ProviderError::ParseError(e.to_string())
        })?;

        if parsed.message.content.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        Ok(parsed)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let url = format!("{}/api/version", self.base_url);
        let response = self
            .client
            .get(&url)
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: "version endpoint unavailable".to_string(),
            })
        }
    }

    fn extract_text(response: &ChatResponse) -> String {
        response.message.content.trim().to_string()
    }
}

/// Drop a chatty preamble from a batch response.
///
/// Despite the instruction payload, chat models sometimes open with
/// "Here is the translation:" before the actual content. When that phrase
/// shows up together with the delimiter token, everything before the first
/// token occurrence is cut; a resulting segment-count mismatch is caught by
/// the dispatcher's per-fragment fallback.
pub fn strip_preamble(content: &str, delimiter_token: &str) -> String {
    if content.to_lowercase().contains("here is") {
        if let Some(index) = content.find(delimiter_token) {
            return content[index..].to_string();
        }
    }
    content.to_string()
}
