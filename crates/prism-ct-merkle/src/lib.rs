//! Merkle proof verification for prism-ct
//!
//! Two independent proof systems are checked here:
//!
//! - CT log audit paths (RFC 6962 node hashing), both the simplified
//!   index-parity walk and the strict tree-size-aware algorithm.
//! - Jellyfish Merkle Tree inclusion proofs from the Prism ledger, keyed by
//!   the SHA-256 of the account key.

pub mod error;
pub mod proof;
pub mod sparse;
pub mod tree;

pub use error::{Error, Result};
pub use proof::{audit_path_holds, verify_audit_path, verify_inclusion_proof};
pub use sparse::{
    key_address_bits, verify_sparse_proof, verify_sparse_proof_hex, JMT_INTERNAL_DOMAIN,
};
pub use tree::{hash_children, hash_leaf, HASH_SIZE, LEAF_HASH_PREFIX, NODE_HASH_PREFIX};
