//! Per-origin verification state
//!
//! The orchestrator writes, hosts read. Each pass for an origin is tagged
//! with a [`PassId`]; writes carrying an older tag are refused, so the
//! entries visible for an origin always belong to a single pass.

use crate::error::{Error, Result};
use crate::verdict::Verdict;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// One log's result within a pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogVerification {
    pub log_name: String,
    pub valid: bool,
    pub timestamp: DateTime<Utc>,
}

impl LogVerification {
    /// Record a result stamped with the current time
    pub fn now(log_name: impl Into<String>, valid: bool) -> Self {
        Self {
            log_name: log_name.into(),
            valid,
            timestamp: Utc::now(),
        }
    }
}

/// Everything known about an origin after its latest pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainVerification {
    pub domain: String,
    pub log_verifications: Vec<LogVerification>,
    pub verdict: Verdict,
}

/// Generation tag of a verification pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PassId(u64);

#[derive(Debug)]
struct Entry {
    pass: PassId,
    verification: DomainVerification,
}

/// In-memory store of the latest verification per origin
///
/// Cloning shares the underlying map. Nothing is persisted or evicted.
///
/// # Example
///
/// ```
/// use prism_ct_verify::{DomainVerificationStore, LogVerification, Verdict};
///
/// # async fn example() -> Result<(), prism_ct_verify::Error> {
/// let store = DomainVerificationStore::new();
///
/// let pass = store.reset("https://example.com").await;
/// store
///     .append("https://example.com", pass, LogVerification::now("Argon", true))
///     .await?;
/// store.publish("https://example.com", pass, Verdict::Valid).await?;
///
/// let verification = store.get("https://example.com").await.unwrap();
/// assert_eq!(verification.log_verifications.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct DomainVerificationStore {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
    next_pass: Arc<AtomicU64>,
}

impl DomainVerificationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new pass for `domain`, discarding the previous one
    pub async fn reset(&self, domain: &str) -> PassId {
        let pass = PassId(self.next_pass.fetch_add(1, Ordering::Relaxed));
        let mut entries = self.entries.write().await;
        entries.insert(
            domain.to_string(),
            Entry {
                pass,
                verification: DomainVerification {
                    domain: domain.to_string(),
                    log_verifications: Vec::new(),
                    verdict: Verdict::Pending,
                },
            },
        );
        pass
    }

    /// Append a log result to the pass `pass` of `domain`
    pub async fn append(
        &self,
        domain: &str,
        pass: PassId,
        verification: LogVerification,
    ) -> Result<()> {
        let mut entries = self.entries.write().await;
        let entry = Self::current(&mut entries, domain, pass)?;
        entry.verification.log_verifications.push(verification);
        Ok(())
    }

    /// Record the aggregate verdict of the pass `pass` of `domain`
    pub async fn publish(&self, domain: &str, pass: PassId, verdict: Verdict) -> Result<()> {
        let mut entries = self.entries.write().await;
        let entry = Self::current(&mut entries, domain, pass)?;
        entry.verification.verdict = verdict;
        Ok(())
    }

    /// Latest verification for `domain`, if a pass was ever started
    pub async fn get(&self, domain: &str) -> Option<DomainVerification> {
        let entries = self.entries.read().await;
        entries.get(domain).map(|entry| entry.verification.clone())
    }

    /// Number of origins with a pass on record
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    fn current<'a>(
        entries: &'a mut HashMap<String, Entry>,
        domain: &str,
        pass: PassId,
    ) -> Result<&'a mut Entry> {
        match entries.get_mut(domain) {
            Some(entry) if entry.pass == pass => Ok(entry),
            _ => Err(Error::Superseded(domain.to_string())),
        }
    }
}
