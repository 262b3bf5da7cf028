/*!
 * Core translation service implementation.
 *
 * This module contains the `TextTranslator` backend seam and the main
 * `TranslationService` struct, which dispatches requests to the configured
 * provider with bounded retry and exponential backoff.
 */

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{debug, warn};
use std::time::Duration;
use url::Url;

use crate::app_config::{TranslationConfig, TranslationProvider as ConfigTranslationProvider};
use crate::errors::{ProviderError, TranslationError};
use crate::language_utils;
use crate::providers::chat::{self, ChatApi, ChatRequest};
use crate::providers::translate_api::{TranslateApi, TranslateRequest};
use crate::providers::Provider;

/// Which timeout budget a request draws from.
///
/// Single-fragment calls are small and should answer fast; whole-batch calls
/// may legitimately run for minutes on a local model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Multi-fragment batch payload
    Batch,
    /// One fragment, fallback path
    Single,
}

/// The backend seam the pipeline dispatches against.
///
/// One UTF-8 string in, one out; failure is an explicit error, never an
/// empty success. Both provider flavors and the test mock conform to this.
#[async_trait]
pub trait TextTranslator: Send + Sync {
    /// Translate one payload string
    async fn translate(&self, text: &str, kind: RequestKind) -> Result<String, TranslationError>;
}

/// Parse an endpoint string into host and port
fn parse_endpoint(endpoint: &str) -> Result<(String, u16)> {
    if endpoint.is_empty() {
        return Err(anyhow!("Endpoint cannot be empty"));
    }

    let url = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        Url::parse(endpoint)?
    } else {
        Url::parse(&format!("http://{}", endpoint))?
    };

    let host = url
        .host_str()
        .ok_or_else(|| anyhow!("Invalid host in endpoint: {}", endpoint))?
        .to_string();

    let port = url
        .port()
        .unwrap_or(if url.scheme() == "https" { 443 } else { 80 });

    Ok((host, port))
}

/// Translation provider implementation variants
enum TranslationProviderImpl {
    /// Conversational chat backend
    Chat {
        /// Client instance
        client: ChatApi,
    },

    /// Single-string translate endpoint backend
    TranslateApi {
        /// Client instance
        client: TranslateApi,
    },
}

/// Main translation service dispatching to the configured backend
pub struct TranslationService {
    /// Provider implementation
    provider: TranslationProviderImpl,

    /// Configuration for the translation service
    pub config: TranslationConfig,

    /// Source language code
    source_language: String,

    /// Target language code
    target_language: String,

    /// Instruction payload with placeholders already substituted
    system_prompt: String,
}

impl TranslationService {
    /// Create a new translation service with the given configuration
    pub fn new(
        config: TranslationConfig,
        source_language: &str,
        target_language: &str,
    ) -> Result<Self> {
        let provider = match config.provider {
            ConfigTranslationProvider::Chat => {
                let (host, port) = parse_endpoint(&config.get_endpoint())?;
                TranslationProviderImpl::Chat {
                    client: ChatApi::new(&host, port),
                }
            }
            ConfigTranslationProvider::TranslateApi => TranslationProviderImpl::TranslateApi {
                client: TranslateApi::from_url(config.get_endpoint()),
            },
        };

        let system_prompt = render_system_prompt(&config, source_language, target_language);

        Ok(Self {
            provider,
            config,
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
            system_prompt,
        })
    }

    /// Probe the configured backend
    pub async fn test_connection(&self) -> Result<(), ProviderError> {
        match &self.provider {
            TranslationProviderImpl::Chat { client } => client.test_connection().await,
            TranslationProviderImpl::TranslateApi { client } => client.test_connection().await,
        }
    }

    /// Timeout budget for one request of the given kind
    fn timeout_for(&self, kind: RequestKind) -> Duration {
        let secs = match kind {
            RequestKind::Batch => self.config.get_batch_timeout_secs(),
            RequestKind::Single => self.config.get_single_timeout_secs(),
        };
        Duration::from_secs(secs)
    }

    /// One attempt against the backend, without retry
    async fn translate_once(
        &self,
        text: &str,
        kind: RequestKind,
    ) -> Result<String, TranslationError> {
        let timeout = self.timeout_for(kind);

        match &self.provider {
            TranslationProviderImpl::Chat { client } => {
                let request = ChatRequest::new(
                    self.config.get_model(),
                    &self.system_prompt,
                    text,
                    timeout,
                )
                .temperature(self.config.common.temperature);

                let response = client.complete(request).await?;
                let content = ChatApi::extract_text(&response);
                Ok(chat::strip_preamble(
                    &content,
                    self.config.delimiter_token(),
                ))
            }
            TranslationProviderImpl::TranslateApi { client } => {
                let request = TranslateRequest {
                    text: text.to_string(),
                    source_language: self.source_language.clone(),
                    target_language: self.target_language.clone(),
                    timeout,
                };

                let response = client.complete(request).await?;
                Ok(TranslateApi::extract_text(&response))
            }
        }
    }
}

#[async_trait]
impl TextTranslator for TranslationService {
    /// Translate one payload with bounded retry and exponential backoff.
    ///
    /// Non-retryable provider errors surface immediately; retryable ones are
    /// re-attempted until the retry budget runs out.
    async fn translate(&self, text: &str, kind: RequestKind) -> Result<String, TranslationError> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        let max_retries = self.config.common.retry_count;
        let backoff_base_ms = self.config.common.retry_backoff_ms;

        let mut attempt = 0u32;
        let mut last_error: Option<TranslationError> = None;

        while attempt <= max_retries {
            if attempt > 0 {
                let backoff_ms = backoff_base_ms * (1u64 << (attempt - 1));
                debug!(
                    "Backing off {} ms before attempt {}/{}",
                    backoff_ms,
                    attempt + 1,
                    max_retries + 1
                );
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }

            match self.translate_once(text, kind).await {
                Ok(translated) => return Ok(translated),
                Err(TranslationError::Provider(e)) if e.is_retryable() => {
                    warn!(
                        "Translation request failed (attempt {}/{}): {}",
                        attempt + 1,
                        max_retries + 1,
                        e
                    );
                    last_error = Some(TranslationError::Provider(e));
                }
                Err(e) => return Err(e),
            }

            attempt += 1;
        }

        Err(last_error.unwrap_or_else(|| {
            TranslationError::Provider(ProviderError::RequestFailed(format!(
                "request failed after {} attempts",
                max_retries + 1
            )))
        }))
    }
}

/// Substitute the prompt template placeholders.
///
/// Language codes are spelled out as English names when the code is known;
/// the model follows "Russian" far more reliably than "ru".
fn render_system_prompt(
    config: &TranslationConfig,
    source_language: &str,
    target_language: &str,
) -> String {
    let source_name = language_utils::get_language_name(source_language)
        .unwrap_or_else(|_| source_language.to_string());
    let target_name = language_utils::get_language_name(target_language)
        .unwrap_or_else(|_| target_language.to_string());

    config
        .common
        .system_prompt
        .replace("{source_language}", &source_name)
        .replace("{target_language}", &target_name)
        .replace("{delimiter}", config.delimiter_token())
}
