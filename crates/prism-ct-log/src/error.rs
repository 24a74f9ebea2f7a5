//! Error types for prism-ct-log

use thiserror::Error;

/// Errors that can occur talking to CT logs or reading their entries
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(String),

    /// Log answered with a non-success status
    #[error("API error: {0}")]
    Api(String),

    /// Log URL could not be joined with an endpoint path
    #[error("Invalid log URL: {0}")]
    Url(#[from] url::ParseError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Certificate could not be parsed or re-encoded
    #[error("Certificate error: {0}")]
    Certificate(String),

    /// Response fields failed validation
    #[error("Types error: {0}")]
    Types(#[from] prism_ct_types::Error),
}

/// Result type for CT log operations
pub type Result<T> = std::result::Result<T, Error>;
