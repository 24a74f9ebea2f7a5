//! Error types for prism-ct-types

use thiserror::Error;

/// Errors that can occur in prism-ct-types
#[derive(Error, Debug)]
pub enum Error {
    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid base64 or hex encoding, or a digest of the wrong length
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Signed tree head or snapshot could not be decoded
    #[error("Invalid tree head: {0}")]
    InvalidTreeHead(String),

    /// Account payload from the ledger has an unexpected shape
    #[error("Invalid account: {0}")]
    InvalidAccount(String),
}

/// Result type for prism-ct-types operations
pub type Result<T> = std::result::Result<T, Error>;
