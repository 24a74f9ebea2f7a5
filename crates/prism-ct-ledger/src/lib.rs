//! Prism ledger access for prism-ct
//!
//! The ledger keeps an account per CT log holding the tree heads a monitor
//! observed. This crate fetches those accounts with their sparse-tree
//! inclusion proofs, and the ledger commitment the proofs resolve to.

pub mod client;
pub mod error;

pub use client::{HttpPrismClient, LedgerAccount, PrismLedgerClient, DEFAULT_PRISM_URL};
pub use error::{Error, Result};
