//! Prism ledger client

use crate::error::{Error, Result};
use prism_ct_types::{
    AccountResponse, Commitment, CommitmentResponse, PrismAccount, PrismSnapshot, SparseProof,
};
use serde::Serialize;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Where a locally running Prism full node serves its API
pub const DEFAULT_PRISM_URL: &str = "http://127.0.0.1:50524";

/// A CT log's account together with its inclusion proof
///
/// Both halves have passed shape validation: the account exists and the
/// proof carries a 32-byte leaf and 32-byte siblings.
#[derive(Debug, Clone)]
pub struct LedgerAccount {
    pub account: PrismAccount,
    pub proof: SparseProof,
}

impl LedgerAccount {
    /// The tree head the ledger most recently witnessed for this log
    pub fn latest_snapshot(&self) -> Result<PrismSnapshot> {
        Ok(self.account.latest_snapshot()?)
    }
}

impl TryFrom<AccountResponse> for LedgerAccount {
    type Error = Error;

    fn try_from(response: AccountResponse) -> Result<Self> {
        let account = response
            .account
            .ok_or_else(|| Error::InvalidResponse("no account in response".to_string()))?;
        let proof = SparseProof::try_from(response.proof)?;
        Ok(Self { account, proof })
    }
}

/// Read access to the Prism ledger
pub trait PrismLedgerClient: Send + Sync {
    /// Fetch the account stored under `key` and its proof against the
    /// ledger's current commitment
    fn fetch_account<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<LedgerAccount>> + Send + 'a>>;

    /// Fetch the ledger's current commitment
    fn get_commitment(&self) -> Pin<Box<dyn Future<Output = Result<Commitment>> + Send + '_>>;
}

#[derive(Serialize)]
struct GetAccountRequest<'a> {
    id: &'a str,
}

/// A client for a Prism node's HTTP API
#[derive(Debug, Clone)]
pub struct HttpPrismClient {
    /// Base URL of the Prism node
    url: String,
    /// HTTP client
    client: reqwest::Client,
}

impl HttpPrismClient {
    /// Create a new Prism client
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Create a client for a node on this machine
    pub fn local() -> Self {
        Self::new(DEFAULT_PRISM_URL)
    }

    /// Create a client whose requests fail after `timeout`
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.url.trim_end_matches('/'), path)
    }

    /// Get an account and its inclusion proof
    pub async fn get_account(&self, id: &str) -> Result<LedgerAccount> {
        let url = self.endpoint("get-account");
        tracing::debug!(%url, account = id, "fetching ledger account");

        let response = self
            .client
            .post(&url)
            .json(&GetAccountRequest { id })
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Api(format!(
                "failed to fetch account {}: {}",
                id,
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Http(format!("failed to read response: {}", e)))?;
        let body: AccountResponse = serde_json::from_str(&body)?;

        LedgerAccount::try_from(body)
    }

    /// Get the root of the ledger's account tree
    pub async fn get_current_commitment(&self) -> Result<Commitment> {
        let url = self.endpoint("get-current-commitment");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Api(format!(
                "failed to get commitment: {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Http(format!("failed to read response: {}", e)))?;
        let body: CommitmentResponse = serde_json::from_str(&body)?;

        Ok(Commitment::try_from(body)?)
    }
}

impl PrismLedgerClient for HttpPrismClient {
    fn fetch_account<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<LedgerAccount>> + Send + 'a>> {
        Box::pin(self.get_account(key))
    }

    fn get_commitment(&self) -> Pin<Box<dyn Future<Output = Result<Commitment>> + Send + '_>> {
        Box::pin(self.get_current_commitment())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_ct_types::ProofResponse;

    #[test]
    fn test_endpoint_joins_once() {
        assert_eq!(
            HttpPrismClient::new("http://node:50524/").endpoint("get-account"),
            "http://node:50524/get-account"
        );
        assert_eq!(
            HttpPrismClient::local().endpoint("get-current-commitment"),
            "http://127.0.0.1:50524/get-current-commitment"
        );
    }

    #[test]
    fn test_missing_account_rejected() {
        let response = AccountResponse {
            account: None,
            proof: ProofResponse {
                leaf: None,
                siblings: Vec::new(),
            },
        };
        assert!(matches!(
            LedgerAccount::try_from(response),
            Err(Error::InvalidResponse(_))
        ));
    }
}
