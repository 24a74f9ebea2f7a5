//! Wire string wrappers and the digest type they decode to
//!
//! CT logs speak base64 and the Prism ledger speaks hex. Both end up as
//! 32-byte digests, so every wire string is decoded through one of these
//! wrappers before it reaches a verifier.

use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

fn base64_bytes(s: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(s)
        .map_err(|e| Error::InvalidEncoding(format!("invalid base64: {}", e)))
}

/// Standard-alphabet base64 as it appears on the wire, undecoded
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Base64(String);

impl Base64 {
    /// Wrap a string as received; nothing is checked until [`Base64::decode`]
    pub fn new(s: impl Into<String>) -> Self {
        Base64(s.into())
    }

    pub fn encode(bytes: &[u8]) -> Self {
        Base64(STANDARD.encode(bytes))
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        base64_bytes(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Base64 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hex digest string from the ledger, parsed with [`Sha256Hash::from_hex`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hex(String);

impl Hex {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A SHA-256 digest
///
/// CT leaf hashes, audit path nodes, tree roots, sparse tree nodes and the
/// ledger commitment all share this type. Parsing checks the length, so a
/// value of this type is always exactly 32 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha256Hash([u8; 32]);

impl Sha256Hash {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Sha256Hash(bytes)
    }

    pub fn try_from_slice(bytes: &[u8]) -> Result<Self> {
        <[u8; 32]>::try_from(bytes).map(Sha256Hash).map_err(|_| {
            Error::InvalidEncoding(format!("digest is {} bytes, expected 32", bytes.len()))
        })
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes =
            hex::decode(s).map_err(|e| Error::InvalidEncoding(format!("invalid hex: {}", e)))?;
        Self::try_from_slice(&bytes)
    }

    pub fn from_base64(s: &str) -> Result<Self> {
        Self::try_from_slice(&base64_bytes(s)?)
    }

    /// Lowercase hex, the ledger's form
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Standard base64, the CT log's form
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Display for Sha256Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}
