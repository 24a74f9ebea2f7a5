//! Error types for prism-ct-ledger

use thiserror::Error;

/// Errors that can occur reading from the Prism ledger
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(String),

    /// Ledger answered with a non-success status
    #[error("API error: {0}")]
    Api(String),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Response parsed but does not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Digest or snapshot fields failed validation
    #[error("Types error: {0}")]
    Types(#[from] prism_ct_types::Error),
}

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;
