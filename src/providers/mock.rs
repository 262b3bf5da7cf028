/*!
 * Mock backend implementation for testing.
 *
 * This module provides a scriptable backend that simulates the behaviors the
 * dispatcher has to survive:
 * - `MockBackend::working()` - Well-behaved: translates each delimiter segment
 * - `MockBackend::delimiter_lost()` - Swallows the delimiter (correlation failure)
 * - `MockBackend::failing()` - Always fails with an error
 * - `MockBackend::fail_first(n)` - Fails the first n requests, then behaves
 * - `MockBackend::empty()` - Succeeds with an empty string
 * - `MockBackend::slow(ms)` - Sleeps before answering
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::errors::{ProviderError, TranslationError};
use crate::translation::core::{RequestKind, TextTranslator};

/// Behavior mode for the mock backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Translates every delimiter segment and keeps the delimiter intact
    Working,
    /// Translates segments but rejoins them with a plain space
    DelimiterLost,
    /// Always fails with an error
    Failing,
    /// Fails the first `count` requests, then behaves like `Working`
    FailFirst {
        /// Requests to fail before recovering
        count: usize,
    },
    /// Returns an empty success
    Empty,
    /// Sleeps before answering like `Working` (for deadline testing)
    Slow {
        /// Artificial response delay
        delay_ms: u64,
    },
}

/// Scriptable backend for exercising dispatch, fallback and deadline paths.
#[derive(Debug)]
pub struct MockBackend {
    /// Behavior mode
    behavior: MockBehavior,
    /// Join delimiter as the pipeline sends it, padding included
    delimiter: String,
    /// Fixed translations keyed by trimmed source text
    lookup: HashMap<String, String>,
    /// Every request received, in order
    calls: Mutex<Vec<(RequestKind, String)>>,
    /// Request counter for fail-first behavior
    request_count: AtomicUsize,
}

impl MockBackend {
    /// Create a mock with the given behavior and delimiter
    pub fn new(behavior: MockBehavior, delimiter: impl Into<String>) -> Self {
        Self {
            behavior,
            delimiter: delimiter.into(),
            lookup: HashMap::new(),
            calls: Mutex::new(Vec::new()),
            request_count: AtomicUsize::new(0),
        }
    }

    /// Well-behaved mock
    pub fn working(delimiter: impl Into<String>) -> Self {
        Self::new(MockBehavior::Working, delimiter)
    }

    /// Mock that loses the delimiter, forcing the fallback path
    pub fn delimiter_lost(delimiter: impl Into<String>) -> Self {
        Self::new(MockBehavior::DelimiterLost, delimiter)
    }

    /// Mock that always errors
    pub fn failing(delimiter: impl Into<String>) -> Self {
        Self::new(MockBehavior::Failing, delimiter)
    }

    /// Mock that errors for the first `count` requests
    pub fn fail_first(count: usize, delimiter: impl Into<String>) -> Self {
        Self::new(MockBehavior::FailFirst { count }, delimiter)
    }

    /// Mock that returns empty successes
    pub fn empty(delimiter: impl Into<String>) -> Self {
        Self::new(MockBehavior::Empty, delimiter)
    }

    /// Mock that answers after an artificial delay
    pub fn slow(delay_ms: u64, delimiter: impl Into<String>) -> Self {
        Self::new(MockBehavior::Slow { delay_ms }, delimiter)
    }

    /// Add fixed translations, keyed by trimmed source text
    pub fn with_lookup(mut self, pairs: &[(&str, &str)]) -> Self {
        for (source, target) in pairs {
            self.lookup.insert(source.to_string(), target.to_string());
        }
        self
    }

    /// Number of requests received so far
    pub fn call_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Requests received so far, in order
    pub fn calls(&self) -> Vec<(RequestKind, String)> {
        self.calls.lock().clone()
    }

    fn delimiter_token(&self) -> &str {
        self.delimiter.trim()
    }

    /// Translate one segment: lookup hit or a recognizable tag
    fn translate_segment(&self, segment: &str) -> String {
        let key = segment.trim();
        match self.lookup.get(key) {
            Some(translation) => translation.clone(),
            None => format!("[TRANSLATED] {}", key),
        }
    }

    /// Translate every delimiter segment, rejoining with `joiner`
    fn translate_payload(&self, text: &str, joiner: &str) -> String {
        text.split(self.delimiter_token())
            .map(|segment| self.translate_segment(segment))
            .collect::<Vec<_>>()
            .join(joiner)
    }
}

#[async_trait]
impl TextTranslator for MockBackend {
    async fn translate(&self, text: &str, kind: RequestKind) -> Result<String, TranslationError> {
        let request_index = self.request_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().push((kind, text.to_string()));

        match self.behavior {
            MockBehavior::Failing => Err(TranslationError::Provider(
                ProviderError::RequestFailed("mock backend failure".to_string()),
            )),
            MockBehavior::FailFirst { count } if request_index < count => {
                Err(TranslationError::Provider(ProviderError::ConnectionError(
                    "mock connection refused".to_string(),
                )))
            }
            MockBehavior::Empty => Ok(String::new()),
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                Ok(self.translate_payload(text, &self.delimiter))
            }
            MockBehavior::DelimiterLost => Ok(self.translate_payload(text, " ")),
            MockBehavior::Working | MockBehavior::FailFirst { .. } => {
                Ok(self.translate_payload(text, &self.delimiter))
            }
        }
    }
}
