//! Core types and data structures for prism-ct
//!
//! This crate provides the data structures shared by the CT log client, the
//! Prism ledger client, and the verifiers: typed digests, signed tree heads,
//! audit proofs, ledger accounts and sparse proofs.

pub mod ct;
pub mod encoding;
pub mod error;
pub mod prism;

pub use ct::{AuditProof, GetProofByHashResponse, GetSthResponse, Sct, SignedTreeHead};
pub use encoding::{Base64, Hex, Sha256Hash};
pub use error::{Error, Result};
pub use prism::{
    AccountResponse, Commitment, CommitmentResponse, Key, PrismAccount, PrismSnapshot,
    ProofResponse, SignedData, SparseProof,
};
