//! Error types for prism-ct-verify

use thiserror::Error;

/// Errors that can occur during verification
#[derive(Error, Debug)]
pub enum Error {
    /// The navigation cannot start a verification pass
    #[error("Invalid navigation: {0}")]
    InvalidNavigation(String),

    /// A collaborator call did not finish within the configured timeout
    #[error("Timed out: {0}")]
    Timeout(String),

    /// A newer pass for the same origin has started
    #[error("Verification pass superseded for {0}")]
    Superseded(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CT log error
    #[error("CT log error: {0}")]
    Log(#[from] prism_ct_log::Error),

    /// Ledger error
    #[error("Ledger error: {0}")]
    Ledger(#[from] prism_ct_ledger::Error),

    /// Merkle proof error
    #[error("Merkle proof error: {0}")]
    Merkle(#[from] prism_ct_merkle::Error),

    /// Types error
    #[error("Types error: {0}")]
    Types(#[from] prism_ct_types::Error),
}

/// Result type for verification operations
pub type Result<T> = std::result::Result<T, Error>;
