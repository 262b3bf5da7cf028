/*!
 * Error types for the epubtrans application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when talking to a translation backend API
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Request exceeded its timeout budget
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Backend reported success but carried no usable text
    #[error("Provider returned an empty response")]
    EmptyResponse,
}

impl ProviderError {
    /// Whether a retry could plausibly succeed.
    ///
    /// Transport failures, timeouts, malformed bodies and server-side errors
    /// are transient; client-side API errors (other than rate limiting) are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ApiError { status_code, .. } => *status_code >= 500 || *status_code == 429,
            _ => true,
        }
    }
}

/// Errors that can occur while decoding, parsing or serializing a markup document
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Resource bytes could not be decoded with the declared encoding
    #[error("Failed to decode resource as {encoding}: {detail}")]
    Decode {
        /// Declared encoding label
        encoding: String,
        /// Decoder failure detail
        detail: String,
    },

    /// Markup could not be parsed into a tree
    #[error("Failed to parse markup: {0}")]
    Parse(String),

    /// Tree could not be serialized back to bytes
    #[error("Failed to serialize markup: {0}")]
    Serialize(String),

    /// A text leaf index did not resolve to a leaf in the tree
    #[error("No text leaf at index {0}")]
    LeafOutOfRange(usize),
}

/// Errors that can occur when reading or writing the archive container
#[derive(Error, Debug)]
pub enum ContainerError {
    /// Error reading the archive
    #[error("Failed to read archive: {0}")]
    Read(String),

    /// Error writing the archive
    #[error("Failed to write archive: {0}")]
    Write(String),
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the backend API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the container service
    #[error("Container error: {0}")]
    Container(#[from] ContainerError),

    /// Error from document processing
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Error from a backend provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// The job did not finish inside its deadline; nothing was persisted
    #[error("Job deadline of {0} seconds exceeded")]
    DeadlineExceeded(u64),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
