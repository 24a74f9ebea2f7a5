//! Verification passes over one navigation
//!
//! For every SCT whose log is known, the leaf is checked twice: against the
//! tree head the log serves right now, and against the tree head the Prism
//! ledger witnessed for that log. The ledger account itself is checked
//! against the ledger commitment, read once before and once after the
//! account so that a commitment moving underneath the read is noticed.

use crate::config::{AuditPathAlgorithm, VerifierConfig};
use crate::error::{Error, Result};
use crate::navigation::Navigation;
use crate::store::{DomainVerification, DomainVerificationStore, LogVerification};
use crate::verdict::{aggregate, LedgerConsistency, SctOutcome};
use chrono::{DateTime, Utc};
use futures::FutureExt;
use prism_ct_ledger::{LedgerAccount, PrismLedgerClient};
use prism_ct_log::{CtLogClient, LeafHashBuilder, LogMetadata, LogRegistry, PrecertLeafHasher};
use prism_ct_merkle::{verify_audit_path, verify_inclusion_proof, verify_sparse_proof};
use prism_ct_types::{Commitment, PrismSnapshot, Sct, Sha256Hash};
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// Everything read from the ledger for one log
#[derive(Debug, Clone)]
pub struct LedgerRead {
    pub consistency: LedgerConsistency,
    /// Present whenever the account fetch succeeded, drift or not
    pub account: Option<LedgerAccount>,
    /// The commitment read before the account
    pub commitment: Option<Commitment>,
}

impl LedgerRead {
    fn unavailable() -> Self {
        Self {
            consistency: LedgerConsistency::Unavailable,
            account: None,
            commitment: None,
        }
    }

    /// The log's tree head as last witnessed by the ledger
    pub fn snapshot(&self) -> Option<PrismSnapshot> {
        let account = self.account.as_ref()?;
        match account.latest_snapshot() {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!(account = %account.account.id, error = %e, "undecodable ledger snapshot");
                None
            }
        }
    }
}

/// Result of one pass
#[derive(Debug, Clone)]
pub struct PassReport {
    /// What was published to the store
    pub verification: DomainVerification,
    /// One entry per SCT whose log was known, in SCT order
    pub outcomes: Vec<SctOutcome>,
}

/// Drives both proof checks for each SCT and publishes the verdict
pub struct Orchestrator {
    registry: Arc<LogRegistry>,
    ct_client: Arc<dyn CtLogClient>,
    ledger: Arc<dyn PrismLedgerClient>,
    leaf_hasher: Arc<dyn LeafHashBuilder>,
    store: DomainVerificationStore,
    config: VerifierConfig,
}

impl Orchestrator {
    /// Create an orchestrator with the default configuration
    pub fn new(
        registry: Arc<LogRegistry>,
        ct_client: Arc<dyn CtLogClient>,
        ledger: Arc<dyn PrismLedgerClient>,
        store: DomainVerificationStore,
    ) -> Self {
        Self {
            registry,
            ct_client,
            ledger,
            leaf_hasher: Arc::new(PrecertLeafHasher),
            store,
            config: VerifierConfig::default(),
        }
    }

    pub fn with_config(mut self, config: VerifierConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace how leaf hashes are derived from certificates
    pub fn with_leaf_hasher(mut self, leaf_hasher: Arc<dyn LeafHashBuilder>) -> Self {
        self.leaf_hasher = leaf_hasher;
        self
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    pub fn store(&self) -> &DomainVerificationStore {
        &self.store
    }

    /// Run a full pass for `navigation` and publish its verdict
    ///
    /// Failures of individual SCTs are recorded, never returned. An error
    /// here means the pass was superseded by a newer one for the same
    /// origin before it could publish.
    pub async fn verify(&self, navigation: &Navigation) -> Result<PassReport> {
        let origin = navigation.origin();
        let pass = self.store.reset(origin).await;
        tracing::info!(origin, scts = navigation.scts().len(), "starting verification pass");

        let mut outcomes = Vec::new();
        for sct in navigation.scts() {
            let log_id = sct.log_id_base64();
            let Some(log) = self.resolve_log(&log_id, navigation.leaf_not_after()) else {
                continue;
            };

            let checked = AssertUnwindSafe(self.verify_sct(navigation, sct, log))
                .catch_unwind()
                .await;
            let outcome = match checked {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(e)) => {
                    tracing::warn!(log = %log.description, error = %e, "SCT verification failed");
                    SctOutcome::failed(&log.description, &log.log_id, e.to_string())
                }
                Err(panic) => {
                    let message = panic_message(panic.as_ref());
                    tracing::error!(log = %log.description, panic = %message, "SCT verification panicked");
                    SctOutcome::failed(
                        &log.description,
                        &log.log_id,
                        format!("panicked: {}", message),
                    )
                }
            };
            tracing::info!(
                log = %outcome.log_name,
                direct = outcome.direct,
                witnessed = outcome.witnessed,
                ledger = ?outcome.ledger,
                "SCT checked"
            );

            self.store
                .append(
                    origin,
                    pass,
                    LogVerification::now(&outcome.log_name, outcome.is_valid()),
                )
                .await?;

            let stop = self.config.stop_at_first_valid && outcome.is_valid();
            outcomes.push(outcome);
            if stop {
                tracing::debug!(origin, "stopping at first valid SCT");
                break;
            }
        }

        let verdict = aggregate(&outcomes, &self.config);
        self.store.publish(origin, pass, verdict).await?;
        tracing::info!(origin, ?verdict, "verification pass complete");

        let verification = self
            .store
            .get(origin)
            .await
            .ok_or_else(|| Error::Superseded(origin.to_string()))?;

        Ok(PassReport {
            verification,
            outcomes,
        })
    }

    fn resolve_log(
        &self,
        log_id: &str,
        leaf_not_after: Option<DateTime<Utc>>,
    ) -> Option<&LogMetadata> {
        let Some(log) = self.registry.get_log_by_id(log_id) else {
            tracing::info!(log_id, "CT log not in registry, skipping SCT");
            return None;
        };
        if self.config.skip_retired_logs && log.is_retired() {
            tracing::info!(log = %log.description, state = log.state_name(), "CT log retired, skipping SCT");
            return None;
        }
        if let Some(not_after) = leaf_not_after {
            if !log.accepts_timestamp(not_after) {
                tracing::info!(log = %log.description, %not_after, "certificate expiry outside log shard, skipping SCT");
                return None;
            }
        }
        Some(log)
    }

    async fn verify_sct(
        &self,
        navigation: &Navigation,
        sct: &Sct,
        log: &LogMetadata,
    ) -> Result<SctOutcome> {
        let leaf_hash = self
            .leaf_hasher
            .leaf_hash(navigation.leaf()?, navigation.issuer()?, sct)?;
        tracing::debug!(log = %log.description, leaf_hash = %leaf_hash.to_base64(), "computed leaf hash");

        let sth = self
            .timed("get-sth", self.ct_client.get_signed_tree_head(log))
            .await?;
        let direct = self
            .audit_path_holds(log, leaf_hash, sth.tree_size, &sth.root_hash)
            .await;

        let ledger = self.read_ledger(&log.log_id).await;
        let witnessed = match ledger.snapshot() {
            Some(snapshot) => {
                self.audit_path_holds(log, leaf_hash, snapshot.tree_size, &snapshot.root_hash)
                    .await
            }
            None => {
                tracing::warn!(log = %log.description, "no witnessed tree head on the ledger");
                false
            }
        };

        Ok(SctOutcome {
            log_name: log.description.clone(),
            log_id: log.log_id.clone(),
            direct,
            witnessed,
            ledger: ledger.consistency,
            error: None,
        })
    }

    /// Fetch the audit path at `tree_size` and check it against `root`
    async fn audit_path_holds(
        &self,
        log: &LogMetadata,
        leaf_hash: Sha256Hash,
        tree_size: u64,
        root: &Sha256Hash,
    ) -> bool {
        let proof = match self
            .timed(
                "get-proof-by-hash",
                self.ct_client.get_proof_by_hash(log, leaf_hash, tree_size),
            )
            .await
        {
            Ok(proof) => proof,
            Err(e) => {
                tracing::warn!(log = %log.description, tree_size, error = %e, "audit path fetch failed");
                return false;
            }
        };

        let result = match self.config.audit_path_algorithm {
            AuditPathAlgorithm::Simplified => {
                verify_audit_path(&leaf_hash, proof.leaf_index, &proof.path, root)
            }
            AuditPathAlgorithm::Rfc6962 => {
                verify_inclusion_proof(&leaf_hash, proof.leaf_index, tree_size, &proof.path, root)
            }
        };

        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(log = %log.description, tree_size, error = %e, "audit path rejected");
                false
            }
        }
    }

    /// Read a log's account between two commitment reads
    ///
    /// The account is returned whenever it was fetched, so its snapshot can
    /// still be used when the commitment moved. The sparse proof is only
    /// checked against a commitment that was the same on both reads.
    pub async fn read_ledger(&self, log_id: &str) -> LedgerRead {
        let before = match self.timed("get-commitment", self.ledger.get_commitment()).await {
            Ok(commitment) => commitment,
            Err(e) => {
                tracing::warn!(error = %e, "ledger commitment unavailable");
                return LedgerRead::unavailable();
            }
        };

        let account = match self.timed("get-account", self.ledger.fetch_account(log_id)).await {
            Ok(account) => account,
            Err(Error::Ledger(
                e @ (prism_ct_ledger::Error::InvalidResponse(_)
                | prism_ct_ledger::Error::Json(_)
                | prism_ct_ledger::Error::Types(_)),
            )) => {
                tracing::warn!(log_id, error = %e, "malformed ledger account");
                return LedgerRead {
                    consistency: LedgerConsistency::Invalid,
                    account: None,
                    commitment: Some(before),
                };
            }
            Err(e) => {
                tracing::warn!(log_id, error = %e, "ledger account unavailable");
                return LedgerRead {
                    commitment: Some(before),
                    ..LedgerRead::unavailable()
                };
            }
        };

        let consistency = match self.timed("get-commitment", self.ledger.get_commitment()).await {
            Err(e) => {
                tracing::warn!(error = %e, "ledger commitment unavailable after account read");
                LedgerConsistency::Unavailable
            }
            Ok(after) if after != before => {
                tracing::warn!(log_id, %before, %after, "ledger commitment moved during account read");
                LedgerConsistency::Drifted
            }
            Ok(_) => Self::check_account(log_id, &account, &before),
        };

        LedgerRead {
            consistency,
            account: Some(account),
            commitment: Some(before),
        }
    }

    fn check_account(
        log_id: &str,
        account: &LedgerAccount,
        commitment: &Commitment,
    ) -> LedgerConsistency {
        if account.account.id != log_id {
            tracing::warn!(log_id, account = %account.account.id, "ledger returned another account");
            return LedgerConsistency::Invalid;
        }

        match verify_sparse_proof(
            log_id,
            &account.proof.leaf,
            &account.proof.siblings,
            commitment.as_hash(),
        ) {
            Ok(()) => LedgerConsistency::Verified,
            Err(e) => {
                tracing::warn!(log_id, error = %e, "account proof does not resolve to commitment");
                LedgerConsistency::Invalid
            }
        }
    }

    async fn timed<T, E>(
        &self,
        what: &str,
        call: impl Future<Output = std::result::Result<T, E>>,
    ) -> Result<T>
    where
        Error: From<E>,
    {
        let timeout = self.config.fetch_timeout();
        match tokio::time::timeout(timeout, call).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(Error::Timeout(format!("{} after {:?}", what, timeout))),
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
