//! What a host hands over to start a verification pass

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use prism_ct_log::{certificate_not_after, extract_scts};
use prism_ct_types::Sct;
use url::Url;

/// A main-frame navigation to an HTTPS origin with its certificate chain
#[derive(Debug, Clone)]
pub struct Navigation {
    origin: String,
    /// DER certificates, leaf first, always at least two long
    chain: Vec<Vec<u8>>,
    scts: Vec<Sct>,
    leaf_not_after: Option<DateTime<Utc>>,
}

impl Navigation {
    /// Build a navigation, reading the SCTs from the leaf certificate
    pub fn from_chain(url: &str, chain: Vec<Vec<u8>>) -> Result<Self> {
        let origin = https_origin(url)?;
        check_chain(&chain)?;
        let scts = extract_scts(&chain[0])?;
        let leaf_not_after = Some(certificate_not_after(&chain[0])?);
        Ok(Self {
            origin,
            chain,
            scts,
            leaf_not_after,
        })
    }

    /// Build a navigation from SCTs the host already extracted
    ///
    /// The leaf's expiry is read when the leaf parses; otherwise logs are
    /// not filtered by temporal shard.
    pub fn with_scts(url: &str, chain: Vec<Vec<u8>>, scts: Vec<Sct>) -> Result<Self> {
        let origin = https_origin(url)?;
        check_chain(&chain)?;
        let leaf_not_after = certificate_not_after(&chain[0]).ok();
        Ok(Self {
            origin,
            chain,
            scts,
            leaf_not_after,
        })
    }

    /// Override the leaf expiry used to match sharded logs
    pub fn with_leaf_expiry(mut self, not_after: DateTime<Utc>) -> Self {
        self.leaf_not_after = Some(not_after);
        self
    }

    /// Serialized origin, e.g. `https://example.com`
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// DER certificates, leaf first
    pub fn chain(&self) -> &[Vec<u8>] {
        &self.chain
    }

    /// SCTs to check, in the order they were presented
    pub fn scts(&self) -> &[Sct] {
        &self.scts
    }

    /// The leaf's notAfter, when known
    pub fn leaf_not_after(&self) -> Option<DateTime<Utc>> {
        self.leaf_not_after
    }

    /// The server certificate
    pub fn leaf(&self) -> Result<&[u8]> {
        self.chain
            .first()
            .map(Vec::as_slice)
            .ok_or_else(|| Error::InvalidNavigation("no certificate presented".to_string()))
    }

    /// The certificate that issued the leaf
    pub fn issuer(&self) -> Result<&[u8]> {
        self.chain
            .get(1)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::InvalidNavigation("certificate chain has no issuer".to_string()))
    }
}

fn https_origin(url: &str) -> Result<String> {
    let parsed = Url::parse(url)
        .map_err(|e| Error::InvalidNavigation(format!("invalid URL {}: {}", url, e)))?;
    if parsed.scheme() != "https" {
        return Err(Error::InvalidNavigation(format!(
            "{} is not an HTTPS URL",
            url
        )));
    }
    Ok(parsed.origin().ascii_serialization())
}

/// The leaf needs its issuer to rebuild the pre-certificate entry
fn check_chain(chain: &[Vec<u8>]) -> Result<()> {
    match chain.len() {
        0 => Err(Error::InvalidNavigation(
            "no certificate presented".to_string(),
        )),
        1 => Err(Error::InvalidNavigation(
            "certificate chain has no issuer".to_string(),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(len: usize) -> Vec<Vec<u8>> {
        (0..len).map(|i| vec![i as u8]).collect()
    }

    #[test]
    fn test_origin_normalised() {
        let navigation =
            Navigation::with_scts("https://Example.COM:443/path?q=1#frag", chain(2), Vec::new())
                .unwrap();
        assert_eq!(navigation.origin(), "https://example.com");
        assert_eq!(navigation.leaf().unwrap(), &[0]);
        assert_eq!(navigation.issuer().unwrap(), &[1]);
        assert_eq!(navigation.chain().len(), 2);
        assert_eq!(navigation.leaf_not_after(), None);

        let expiry = Utc::now();
        assert_eq!(
            navigation.with_leaf_expiry(expiry).leaf_not_after(),
            Some(expiry)
        );

        let port = Navigation::with_scts("https://example.com:8443/", chain(2), Vec::new()).unwrap();
        assert_eq!(port.origin(), "https://example.com:8443");
    }

    #[test]
    fn test_plain_http_rejected() {
        assert!(matches!(
            Navigation::with_scts("http://example.com/", chain(2), Vec::new()),
            Err(Error::InvalidNavigation(_))
        ));
        assert!(matches!(
            Navigation::with_scts("not a url", chain(2), Vec::new()),
            Err(Error::InvalidNavigation(_))
        ));
    }

    #[test]
    fn test_short_chain_rejected() {
        for len in [0, 1] {
            assert!(matches!(
                Navigation::with_scts("https://example.com/", chain(len), Vec::new()),
                Err(Error::InvalidNavigation(_))
            ));
        }
    }

    #[test]
    fn test_missing_certificates_are_errors() {
        let mut navigation =
            Navigation::with_scts("https://example.com/", chain(2), Vec::new()).unwrap();
        navigation.chain.truncate(1);
        assert!(navigation.leaf().is_ok());
        assert!(matches!(navigation.issuer(), Err(Error::InvalidNavigation(_))));

        navigation.chain.clear();
        assert!(matches!(navigation.leaf(), Err(Error::InvalidNavigation(_))));
    }

    #[test]
    fn test_unparseable_leaf_rejected() {
        assert!(matches!(
            Navigation::from_chain("https://example.com/", chain(2)),
            Err(Error::Log(_))
        ));
    }
}
