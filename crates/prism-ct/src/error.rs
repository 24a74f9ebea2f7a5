//! Error types for prism-ct

use thiserror::Error;

/// Errors that can occur setting up or running verification
#[derive(Error, Debug)]
pub enum Error {
    /// CT log error
    #[error("CT log error: {0}")]
    Log(#[from] prism_ct_log::Error),

    /// Ledger error
    #[error("Ledger error: {0}")]
    Ledger(#[from] prism_ct_ledger::Error),

    /// Verification error
    #[error("Verification error: {0}")]
    Verify(#[from] prism_ct_verify::Error),
}

/// Result type for prism-ct operations
pub type Result<T> = std::result::Result<T, Error>;
