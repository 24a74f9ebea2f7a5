//! Verification over the network clients

use crate::error::Result;
use prism_ct_ledger::HttpPrismClient;
use prism_ct_log::{HttpCtLogClient, LogRegistry};
use prism_ct_verify::{
    DomainVerificationStore, Navigation, Orchestrator, PassReport, VerifierConfig,
};
use std::sync::Arc;

/// Build an orchestrator talking HTTP to the CT logs in `registry` and to
/// the Prism node at `prism_url`
///
/// Both clients get the configured fetch timeout as their request timeout,
/// on top of the orchestrator's own per-call timeout.
pub fn http_orchestrator(
    registry: LogRegistry,
    prism_url: &str,
    config: VerifierConfig,
    store: DomainVerificationStore,
) -> Result<Orchestrator> {
    let timeout = config.fetch_timeout();
    let ct_client = HttpCtLogClient::with_timeout(timeout)?;
    let ledger = HttpPrismClient::with_timeout(prism_url, timeout)?;
    tracing::debug!(logs = registry.len(), prism_url, "configured verifier");

    Ok(Orchestrator::new(
        Arc::new(registry),
        Arc::new(ct_client),
        Arc::new(ledger),
        store,
    )
    .with_config(config))
}

/// Verify a certificate chain served for `url`
///
/// The chain is DER certificates, leaf first. Fails only when the pass
/// cannot start (non-HTTPS URL, missing issuer, unparseable leaf) or was
/// superseded; the verdict is in the report.
pub async fn verify_chain(
    orchestrator: &Orchestrator,
    url: &str,
    chain: Vec<Vec<u8>>,
) -> Result<PassReport> {
    let navigation = Navigation::from_chain(url, chain)?;
    Ok(orchestrator.verify(&navigation).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[tokio::test]
    async fn test_verify_chain_rejects_plain_http() {
        let orchestrator = http_orchestrator(
            LogRegistry::default(),
            prism_ct_ledger::DEFAULT_PRISM_URL,
            VerifierConfig::default(),
            DomainVerificationStore::new(),
        )
        .unwrap();

        let result = verify_chain(&orchestrator, "http://example.com/", vec![vec![0], vec![1]]).await;
        assert!(matches!(
            result,
            Err(Error::Verify(prism_ct_verify::Error::InvalidNavigation(_)))
        ));
        assert!(orchestrator.store().is_empty().await);
    }
}
