//! Embedded SCTs and the log entries they promise
//!
//! A certificate carrying embedded SCTs was logged as a pre-certificate.
//! The log's Merkle leaf for it is a `MerkleTreeLeaf` (RFC 6962 §3.4) whose
//! entry holds the issuer key hash and the TBS certificate with the SCT
//! list extension removed.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use const_oid::db::rfc6962::CT_PRECERT_SCTS;
use prism_ct_merkle::hash_leaf;
use prism_ct_types::{Sct, Sha256Hash};
use sha2::{Digest, Sha256};
use tls_codec::{SerializeBytes, TlsByteVecU16, TlsByteVecU24, TlsSerializeBytes, TlsSize};
use x509_cert::{
    der::{Decode, Encode},
    ext::pkix::{sct::Version, SignedCertificateTimestampList},
    Certificate,
};

/// MerkleLeafType as defined in RFC 6962
#[derive(PartialEq, Debug, TlsSerializeBytes, TlsSize)]
#[repr(u8)]
enum MerkleLeafType {
    TimestampedEntry = 0,
}

/// LogEntryType as defined in RFC 6962
#[derive(PartialEq, Debug)]
#[repr(u16)]
enum LogEntryType {
    X509Entry = 0,
    PrecertEntry = 1,
}

#[derive(PartialEq, Debug, TlsSerializeBytes, TlsSize)]
struct PreCert {
    /// SHA-256 of the issuer's SubjectPublicKeyInfo
    issuer_key_hash: [u8; 32],
    /// TBSCertificate with the SCT extension removed
    tbs_certificate: TlsByteVecU24,
}

#[derive(PartialEq, Debug, TlsSerializeBytes, TlsSize)]
#[repr(u16)]
enum SignedEntry {
    #[allow(unused)]
    #[tls_codec(discriminant = "LogEntryType::X509Entry")]
    X509Entry(TlsByteVecU24),
    #[tls_codec(discriminant = "LogEntryType::PrecertEntry")]
    PrecertEntry(PreCert),
}

/// `MerkleTreeLeaf` with its single `TimestampedEntry` inlined
#[derive(PartialEq, Debug, TlsSerializeBytes, TlsSize)]
struct MerkleTreeLeaf {
    version: Version,
    leaf_type: MerkleLeafType,
    timestamp: u64,
    signed_entry: SignedEntry,
    extensions: TlsByteVecU16,
}

/// Builds the Merkle leaf hash a log assigned to a certificate
pub trait LeafHashBuilder: Send + Sync {
    fn leaf_hash(&self, cert_der: &[u8], issuer_der: &[u8], sct: &Sct) -> Result<Sha256Hash>;
}

/// [`LeafHashBuilder`] for certificates with embedded SCTs
#[derive(Debug, Clone, Copy, Default)]
pub struct PrecertLeafHasher;

impl LeafHashBuilder for PrecertLeafHasher {
    fn leaf_hash(&self, cert_der: &[u8], issuer_der: &[u8], sct: &Sct) -> Result<Sha256Hash> {
        leaf_hash_for_precert(cert_der, issuer_der, sct.timestamp, &sct.extensions)
    }
}

fn parse_certificate(der: &[u8], what: &str) -> Result<Certificate> {
    Certificate::from_der(der)
        .map_err(|e| Error::Certificate(format!("failed to parse {}: {}", what, e)))
}

/// Extract every SCT embedded in a certificate
///
/// A certificate without the SCT list extension yields an empty list.
pub fn extract_scts(cert_der: &[u8]) -> Result<Vec<Sct>> {
    let cert = parse_certificate(cert_der, "certificate")?;

    let scts: SignedCertificateTimestampList = match cert.tbs_certificate.get() {
        Ok(Some((_, ext))) => ext,
        Ok(None) => return Ok(Vec::new()),
        Err(e) => {
            return Err(Error::Certificate(format!(
                "malformed SCT list extension: {}",
                e
            )))
        }
    };

    let timestamps = scts
        .parse_timestamps()
        .map_err(|e| Error::Certificate(format!("failed to parse SCT list: {:?}", e)))?;

    timestamps
        .iter()
        .map(|serialized| {
            let sct = serialized
                .parse_timestamp()
                .map_err(|e| Error::Certificate(format!("failed to parse SCT: {:?}", e)))?;
            Ok(Sct {
                log_id: sct.log_id.key_id,
                timestamp: sct.timestamp,
                extensions: sct.extensions.as_slice().to_vec(),
            })
        })
        .collect()
}

/// Expiry of a certificate, used to pick the temporal shard it was logged to
pub fn certificate_not_after(cert_der: &[u8]) -> Result<DateTime<Utc>> {
    let cert = parse_certificate(cert_der, "certificate")?;
    let not_after = cert.tbs_certificate.validity.not_after.to_unix_duration();
    i64::try_from(not_after.as_secs())
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or_else(|| Error::Certificate(format!("notAfter out of range: {:?}", not_after)))
}

/// Leaf hash of the pre-certificate entry behind an embedded SCT
///
/// `timestamp` and `extensions` come from the SCT; the log signed over the
/// same values when it issued it.
pub fn leaf_hash_for_precert(
    cert_der: &[u8],
    issuer_der: &[u8],
    timestamp: u64,
    extensions: &[u8],
) -> Result<Sha256Hash> {
    let cert = parse_certificate(cert_der, "certificate")?;
    let issuer = parse_certificate(issuer_der, "issuer certificate")?;

    let issuer_spki_der = issuer
        .tbs_certificate
        .subject_public_key_info
        .to_der()
        .map_err(|e| Error::Certificate(format!("failed to encode issuer SPKI: {}", e)))?;
    let issuer_key_hash: [u8; 32] = Sha256::digest(&issuer_spki_der).into();

    let mut tbs_precert = cert.tbs_certificate.clone();
    tbs_precert.extensions = tbs_precert.extensions.map(|exts| {
        exts.iter()
            .filter(|ext| ext.extn_id != CT_PRECERT_SCTS)
            .cloned()
            .collect()
    });

    let mut tbs_precert_der = Vec::new();
    tbs_precert
        .encode_to_vec(&mut tbs_precert_der)
        .map_err(|e| Error::Certificate(format!("failed to encode precert TBS: {}", e)))?;

    let leaf = MerkleTreeLeaf {
        version: Version::V1,
        leaf_type: MerkleLeafType::TimestampedEntry,
        timestamp,
        signed_entry: SignedEntry::PrecertEntry(PreCert {
            issuer_key_hash,
            tbs_certificate: tbs_precert_der.as_slice().into(),
        }),
        extensions: extensions.into(),
    };

    let leaf_bytes = leaf
        .tls_serialize()
        .map_err(|e| Error::Certificate(format!("failed to serialize Merkle leaf: {}", e)))?;

    Ok(hash_leaf(&leaf_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_certificate_rejected() {
        assert!(matches!(
            extract_scts(b"not a certificate"),
            Err(Error::Certificate(_))
        ));
        assert!(matches!(
            leaf_hash_for_precert(b"\x30\x00", b"\x30\x00", 0, &[]),
            Err(Error::Certificate(_))
        ));
    }
}
