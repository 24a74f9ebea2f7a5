//! Prism ledger types
//!
//! The ledger keeps one account per CT log, keyed by the log ID. Each
//! account accumulates signed snapshots of the log's tree head; the last
//! one is what the ledger currently witnesses for that log.

use crate::encoding::{Base64, Hex, Sha256Hash};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Size of the fixed part of a packed snapshot: tree size, timestamp, root
const PACKED_SNAPSHOT_HEADER: usize = 8 + 8 + 32;

/// A public key registered on an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
    pub algorithm: String,
    pub bytes: Base64,
}

/// One signed data blob appended to an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedData {
    pub key: Key,
    pub data: Base64,
}

/// A ledger account, read-only from our side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrismAccount {
    pub id: String,
    pub nonce: u64,
    #[serde(default)]
    pub valid_keys: Vec<Key>,
    #[serde(default)]
    pub signed_data: Vec<SignedData>,
    /// Opaque to this crate; carried through untouched
    #[serde(default)]
    pub service_challenge: Option<serde_json::Value>,
}

impl PrismAccount {
    /// Decode the most recent snapshot on this account
    pub fn latest_snapshot(&self) -> Result<PrismSnapshot> {
        let latest = self.signed_data.last().ok_or_else(|| {
            Error::InvalidAccount(format!("account {} has no signed data", self.id))
        })?;
        PrismSnapshot::decode(&latest.data.decode()?)
    }
}

/// Sparse tree proof exactly as the ledger returns it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProofResponse {
    /// Absent when the ledger proves non-inclusion
    #[serde(default)]
    pub leaf: Option<Hex>,
    #[serde(default)]
    pub siblings: Vec<Hex>,
}

/// `get-account` response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    #[serde(default)]
    pub account: Option<PrismAccount>,
    pub proof: ProofResponse,
}

/// `get-current-commitment` response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitmentResponse {
    pub commitment: Hex,
}

/// Validated inclusion proof of an account under a commitment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparseProof {
    pub leaf: Sha256Hash,
    /// Ordered leaf to root
    pub siblings: Vec<Sha256Hash>,
}

impl TryFrom<ProofResponse> for SparseProof {
    type Error = Error;

    fn try_from(proof: ProofResponse) -> Result<Self> {
        let leaf = proof
            .leaf
            .ok_or_else(|| Error::MissingField("proof.leaf".to_string()))?;
        let leaf = Sha256Hash::from_hex(leaf.as_str())?;
        let siblings = proof
            .siblings
            .iter()
            .map(|s| Sha256Hash::from_hex(s.as_str()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { leaf, siblings })
    }
}

/// Root of the ledger's global sparse tree at one moment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Commitment(pub Sha256Hash);

impl Commitment {
    pub fn from_hex(s: &str) -> Result<Self> {
        Ok(Self(Sha256Hash::from_hex(s)?))
    }

    pub fn as_hash(&self) -> &Sha256Hash {
        &self.0
    }
}

impl TryFrom<CommitmentResponse> for Commitment {
    type Error = Error;

    fn try_from(response: CommitmentResponse) -> Result<Self> {
        Self::from_hex(response.commitment.as_str())
    }
}

impl std::fmt::Display for Commitment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// A CT log tree head as witnessed by the ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrismSnapshot {
    pub tree_size: u64,
    pub root_hash: Sha256Hash,
}

/// JSON form submitted by the CT monitor
#[derive(Deserialize)]
struct JsonSnapshot {
    tree_size: u64,
    #[serde(alias = "root_hash")]
    sha256_root_hash: Base64,
}

impl PrismSnapshot {
    /// Decode a snapshot blob
    ///
    /// Blobs starting with `{` are read as the monitor's JSON tree head.
    /// Anything else is read as the packed layout: little-endian u64 tree
    /// size, little-endian u64 timestamp, 32-byte root, then signature.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let first = bytes.iter().find(|b| !b.is_ascii_whitespace());
        if first == Some(&b'{') {
            let json: JsonSnapshot = serde_json::from_slice(bytes)?;
            let root_hash = Sha256Hash::from_base64(json.sha256_root_hash.as_str())
                .map_err(|e| Error::InvalidTreeHead(format!("snapshot root: {}", e)))?;
            return Ok(Self {
                tree_size: json.tree_size,
                root_hash,
            });
        }

        if bytes.len() < PACKED_SNAPSHOT_HEADER {
            return Err(Error::InvalidTreeHead(format!(
                "packed snapshot needs at least {} bytes, got {}",
                PACKED_SNAPSHOT_HEADER,
                bytes.len()
            )));
        }
        let mut size = [0u8; 8];
        size.copy_from_slice(&bytes[..8]);
        let root_hash = Sha256Hash::try_from_slice(&bytes[16..PACKED_SNAPSHOT_HEADER])?;

        Ok(Self {
            tree_size: u64::from_le_bytes(size),
            root_hash,
        })
    }
}
