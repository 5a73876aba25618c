/*!
 * Error types for the srt-translator application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when working with provider APIs
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

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The request could not be built (bad endpoint, bad parameters)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A required configuration value is missing
    #[error("Missing configuration for provider '{provider}': {field}")]
    MissingConfiguration {
        /// Registry key of the provider
        provider: String,
        /// Name of the missing field
        field: String,
    },
}

impl ProviderError {
    /// Map an HTTP error status to the matching error variant
    pub fn from_status(status_code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status_code {
            401 | 403 => Self::AuthenticationError(message),
            429 => Self::RateLimitExceeded(message),
            _ => Self::ApiError { status_code, message },
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() || error.is_connect() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else if let Some(status) = error.status() {
            Self::from_status(status.as_u16(), error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Errors raised by the provider registry
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The requested provider key was never registered
    #[error("Provider '{name}' not found. Available providers: [{}]", .available.join(", "))]
    ProviderNotFound {
        /// Requested key
        name: String,
        /// Keys registered at the time of the lookup
        available: Vec<String>,
    },

    /// The provider was found but its factory rejected the configuration
    #[error("Failed to create provider '{name}': {source}")]
    Construction {
        /// Requested key
        name: String,
        /// Factory error
        #[source]
        source: ProviderError,
    },
}

/// Errors that can occur during subtitle processing
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// The subtitle file could not be read
    #[error("Failed to read subtitle file {path}: {message}")]
    Read {
        /// File path
        path: String,
        /// Underlying I/O error message
        message: String,
    },

    /// The subtitle file could not be written
    #[error("Failed to write subtitle file {path}: {message}")]
    Write {
        /// File path
        path: String,
        /// Underlying I/O error message
        message: String,
    },

    /// A block could not be parsed under the strict parse policy
    #[error("Malformed subtitle block {block}: {reason}")]
    MalformedBlock {
        /// 1-based position of the block in the file
        block: usize,
        /// Why the block was rejected
        reason: String,
    },

    /// Batches must hold at least one entry
    #[error("Invalid batch size: {0} (must be at least 1)")]
    InvalidBatchSize(usize),
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error with subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// A provider returned a different number of results than texts sent
    #[error("Provider returned {actual} results for {expected} texts")]
    ResultCountMismatch {
        /// Texts sent
        expected: usize,
        /// Results received
        actual: usize,
    },
}
