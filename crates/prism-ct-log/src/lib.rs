//! Certificate Transparency log access for prism-ct
//!
//! This crate knows which CT logs exist ([`LogRegistry`]), how to ask a log
//! for its tree head and audit paths ([`CtLogClient`]), and how to derive
//! the Merkle leaf a log assigned to a certificate from the SCTs embedded
//! in it ([`extract_scts`], [`leaf_hash_for_precert`]).
//!
//! # Example
//!
//! ```no_run
//! use prism_ct_log::{HttpCtLogClient, LogRegistry};
//!
//! # async fn example() -> Result<(), prism_ct_log::Error> {
//! let registry = LogRegistry::from_file("log_list.json")?;
//! let client = HttpCtLogClient::new();
//!
//! if let Some(log) = registry.get_log_by_id("TnWjJ1yaEMM4W2zU3z9S6x3w4I4bjWnAsfpksWKaOd8=") {
//!     let sth = client.get_sth(log).await?;
//!     println!("{} has {} entries", log.description, sth.tree_size);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod leaf;
pub mod registry;

pub use client::{CtLogClient, HttpCtLogClient};
pub use error::{Error, Result};
pub use leaf::{
    certificate_not_after, extract_scts, leaf_hash_for_precert, LeafHashBuilder, PrecertLeafHasher,
};
pub use registry::{
    CtLogList, FinalTreeHead, LogMetadata, LogOperator, LogRegistry, LogState, TemporalInterval,
};
