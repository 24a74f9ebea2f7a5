//! Certificate Transparency verification cross-checked against Prism
//!
//! This is the main entry point. It wires the RFC 6962 log client and the
//! Prism ledger client into a verification orchestrator and re-exports the
//! building blocks.

pub mod error;
pub mod verify;

// Re-export core crates
pub use prism_ct_ledger as ledger;
pub use prism_ct_log as ct_log;
pub use prism_ct_merkle as merkle;
pub use prism_ct_types as types;
pub use prism_ct_verify as verifier;

pub use error::{Error, Result};
pub use prism_ct_verify::{
    DomainVerification, DomainVerificationStore, LogVerification, Navigation, Orchestrator,
    PassReport, TrustState, Verdict, VerifierConfig,
};
pub use verify::{http_orchestrator, verify_chain};
