//! Certificate Transparency log types
//!
//! Wire types mirror the JSON returned by the RFC 6962 `ct/v1` API
//! (base64 strings, plain integers). The typed counterparts hold decoded,
//! length-checked digests.

use crate::encoding::{Base64, Sha256Hash};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A Signed Certificate Timestamp as embedded in a certificate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sct {
    /// SHA-256 of the issuing log's public key
    pub log_id: [u8; 32],
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
    /// Opaque `CtExtensions` bytes
    pub extensions: Vec<u8>,
}

impl Sct {
    /// The log ID in the base64 form used by log lists
    pub fn log_id_base64(&self) -> String {
        Base64::encode(&self.log_id).to_string()
    }
}

/// `get-sth` response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetSthResponse {
    pub tree_size: u64,
    pub timestamp: u64,
    pub sha256_root_hash: Base64,
    pub tree_head_signature: Base64,
}

/// A log's signed view of its own tree
///
/// The signature is carried along but never checked here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTreeHead {
    pub tree_size: u64,
    pub timestamp: u64,
    pub root_hash: Sha256Hash,
    pub signature: Vec<u8>,
}

impl TryFrom<GetSthResponse> for SignedTreeHead {
    type Error = Error;

    fn try_from(response: GetSthResponse) -> Result<Self> {
        let root_hash = Sha256Hash::from_base64(response.sha256_root_hash.as_str())
            .map_err(|e| Error::InvalidTreeHead(format!("root hash: {}", e)))?;
        let signature = response
            .tree_head_signature
            .decode()
            .map_err(|e| Error::InvalidTreeHead(format!("signature: {}", e)))?;

        Ok(Self {
            tree_size: response.tree_size,
            timestamp: response.timestamp,
            root_hash,
            signature,
        })
    }
}

/// `get-proof-by-hash` response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetProofByHashResponse {
    pub leaf_index: u64,
    pub audit_path: Vec<Base64>,
}

/// Merkle audit path for one leaf, ordered leaf to root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditProof {
    pub leaf_index: u64,
    pub path: Vec<Sha256Hash>,
}

impl TryFrom<GetProofByHashResponse> for AuditProof {
    type Error = Error;

    fn try_from(response: GetProofByHashResponse) -> Result<Self> {
        let path = response
            .audit_path
            .iter()
            .map(|node| Sha256Hash::from_base64(node.as_str()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            leaf_index: response.leaf_index,
            path,
        })
    }
}
