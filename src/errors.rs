/*!
 * Error types for the paratrans application.
 *
 * This module contains custom error types for the different layers of the
 * application, using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;

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
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() || error.is_connect() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Errors raised while reading, splitting or writing documents
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The input is neither an allowed file type nor a URL
    #[error("Unsupported file type: {path:?} (use a .txt, .md, .rtf or .html file, or a URL)")]
    UnsupportedFileType {
        /// Offending path
        path: PathBuf,
    },

    /// Reference exclusion was requested but no section header matched
    #[error("No references section found")]
    ReferencesNotFound,

    /// Readable text could not be extracted from HTML
    #[error("Text extraction failed: {0}")]
    Extraction(String),

    /// Downloading a URL failed
    #[error("Failed to download {url}: {message}")]
    Download {
        /// Requested URL
        url: String,
        /// Underlying failure
        message: String,
    },
}

/// Errors found while validating the configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No API key was supplied through the CLI, environment or config file
    #[error("Please provide your API key (--api-key or OPENAI_API_KEY)")]
    MissingApiKey,

    /// A configuration value is out of range
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// Configuration field name
        field: String,
        /// Why the value was rejected
        reason: String,
    },
}
