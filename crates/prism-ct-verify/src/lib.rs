//! Certificate verification against a CT log and the Prism ledger
//!
//! A certificate is trusted when the CT log proves inclusion of its entry
//! both under the tree head the log serves and under the tree head the
//! Prism ledger independently witnessed for that log. A log showing
//! different views to different clients cannot satisfy both.
//!
//! # Example
//!
//! ```no_run
//! use prism_ct_ledger::HttpPrismClient;
//! use prism_ct_log::{HttpCtLogClient, LogRegistry};
//! use prism_ct_verify::{DomainVerificationStore, Navigation, Orchestrator};
//! use std::sync::Arc;
//!
//! # async fn example(chain: Vec<Vec<u8>>) -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Arc::new(LogRegistry::from_file("log_list.json")?);
//! let orchestrator = Orchestrator::new(
//!     registry,
//!     Arc::new(HttpCtLogClient::new()),
//!     Arc::new(HttpPrismClient::local()),
//!     DomainVerificationStore::new(),
//! );
//!
//! let navigation = Navigation::from_chain("https://example.com/", chain)?;
//! let report = orchestrator.verify(&navigation).await?;
//! println!("{:?}", report.verification.verdict.trust_state());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod navigation;
pub mod orchestrator;
pub mod store;
pub mod verdict;

pub use config::{AuditPathAlgorithm, VerifierConfig};
pub use error::{Error, Result};
pub use navigation::Navigation;
pub use orchestrator::{LedgerRead, Orchestrator, PassReport};
pub use store::{DomainVerification, DomainVerificationStore, LogVerification, PassId};
pub use verdict::{aggregate, LedgerConsistency, SctOutcome, TrustState, Verdict};
