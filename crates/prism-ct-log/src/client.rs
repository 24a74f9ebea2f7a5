//! RFC 6962 log client
//!
//! Only the two read endpoints the verifier needs are implemented:
//! `ct/v1/get-sth` and `ct/v1/get-proof-by-hash`.

use crate::error::{Error, Result};
use crate::registry::LogMetadata;
use prism_ct_types::{
    AuditProof, GetProofByHashResponse, GetSthResponse, Sha256Hash, SignedTreeHead,
};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use url::Url;

/// Source of tree heads and audit paths for a CT log
///
/// Implementations must be usable across tasks; the orchestrator holds
/// them behind `Arc<dyn CtLogClient>`.
pub trait CtLogClient: Send + Sync {
    /// Fetch the log's current signed tree head
    fn get_signed_tree_head<'a>(
        &'a self,
        log: &'a LogMetadata,
    ) -> Pin<Box<dyn Future<Output = Result<SignedTreeHead>> + Send + 'a>>;

    /// Fetch the audit path for `leaf_hash` in the tree of `tree_size` leaves
    fn get_proof_by_hash<'a>(
        &'a self,
        log: &'a LogMetadata,
        leaf_hash: Sha256Hash,
        tree_size: u64,
    ) -> Pin<Box<dyn Future<Output = Result<AuditProof>> + Send + 'a>>;
}

/// A client for the RFC 6962 HTTP API
#[derive(Debug, Clone, Default)]
pub struct HttpCtLogClient {
    client: reqwest::Client,
}

impl HttpCtLogClient {
    /// Create a client with no request timeout
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Create a client whose requests fail after `timeout`
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;
        Ok(Self { client })
    }

    /// Resolve `path` against the log's submission prefix
    ///
    /// Log lists write the prefix with a trailing slash; one is added when
    /// missing so the last path segment is not replaced by the join.
    fn endpoint(log: &LogMetadata, path: &str) -> Result<Url> {
        let mut base = Url::parse(&log.url)?;
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        Ok(base.join(path)?)
    }

    /// Get the signed tree head
    pub async fn get_sth(&self, log: &LogMetadata) -> Result<SignedTreeHead> {
        let url = Self::endpoint(log, "ct/v1/get-sth")?;
        tracing::debug!(log = %log.description, %url, "fetching signed tree head");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Api(format!(
                "failed to get STH from {}: {}",
                log.description,
                response.status()
            )));
        }

        let sth: GetSthResponse = response
            .json()
            .await
            .map_err(|e| Error::Http(format!("failed to parse JSON: {}", e)))?;

        Ok(SignedTreeHead::try_from(sth)?)
    }

    /// Get the audit path for a leaf hash at a given tree size
    pub async fn get_proof(
        &self,
        log: &LogMetadata,
        leaf_hash: &Sha256Hash,
        tree_size: u64,
    ) -> Result<AuditProof> {
        let mut url = Self::endpoint(log, "ct/v1/get-proof-by-hash")?;
        url.query_pairs_mut()
            .append_pair("hash", &leaf_hash.to_base64())
            .append_pair("tree_size", &tree_size.to_string());
        tracing::debug!(log = %log.description, tree_size, "fetching audit path");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api(format!(
                "failed to get proof from {} at tree size {}: {} - {}",
                log.description, tree_size, status, body
            )));
        }

        let proof: GetProofByHashResponse = response
            .json()
            .await
            .map_err(|e| Error::Http(format!("failed to parse JSON: {}", e)))?;

        Ok(AuditProof::try_from(proof)?)
    }
}

impl CtLogClient for HttpCtLogClient {
    fn get_signed_tree_head<'a>(
        &'a self,
        log: &'a LogMetadata,
    ) -> Pin<Box<dyn Future<Output = Result<SignedTreeHead>> + Send + 'a>> {
        Box::pin(self.get_sth(log))
    }

    fn get_proof_by_hash<'a>(
        &'a self,
        log: &'a LogMetadata,
        leaf_hash: Sha256Hash,
        tree_size: u64,
    ) -> Pin<Box<dyn Future<Output = Result<AuditProof>> + Send + 'a>> {
        Box::pin(async move { self.get_proof(log, &leaf_hash, tree_size).await })
    }
}
