//! Error types for prism-ct-merkle

use thiserror::Error;

/// Errors that can occur in Merkle proof verification
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid proof format
    #[error("Invalid proof: {0}")]
    InvalidProof(String),

    /// Invalid tree size
    #[error("Invalid tree size: {0}")]
    InvalidTreeSize(String),

    /// Invalid leaf index
    #[error("Invalid leaf index: {0}")]
    InvalidLeafIndex(String),

    /// Recomputed root does not match the expected one
    #[error("Hash mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: String, actual: String },

    /// Malformed hex/base64 or wrong-length digest
    #[error("Encoding error: {0}")]
    Encoding(#[from] prism_ct_types::Error),
}

/// Result type for Merkle operations
pub type Result<T> = std::result::Result<T, Error>;
