//! Jellyfish Merkle Tree inclusion proofs
//!
//! The Prism ledger stores accounts in a 256-level sparse tree addressed by
//! SHA-256 of the account key. A proof carries the account's leaf hash and
//! the siblings on its path, nearest-the-leaf first.

use crate::error::{Error, Result};
use prism_ct_types::Sha256Hash;
use sha2::{Digest, Sha256};

/// Domain separator prepended to every internal node preimage
///
/// The misspelling is part of the ledger's hash preimage and must not be
/// corrected.
pub const JMT_INTERNAL_DOMAIN: &[u8; 16] = b"JMT::IntrnalNode";

/// Expand SHA-256(key) into 256 bits, most significant bit first
pub fn key_address_bits(key: &str) -> [bool; 256] {
    let address: [u8; 32] = Sha256::digest(key.as_bytes()).into();
    let mut bits = [false; 256];
    for (i, byte) in address.iter().enumerate() {
        for j in 0..8 {
            bits[i * 8 + j] = (byte >> (7 - j)) & 1 == 1;
        }
    }
    bits
}

fn hash_internal(left: &Sha256Hash, right: &Sha256Hash) -> Sha256Hash {
    let mut hasher = Sha256::new();
    hasher.update(JMT_INTERNAL_DOMAIN);
    hasher.update(left.as_bytes());
    hasher.update(right.as_bytes());
    Sha256Hash::from_bytes(hasher.finalize().into())
}

/// Verify that `leaf` sits under `commitment` at the address of `key`
///
/// Siblings are consumed in order while the address bit is read backwards
/// from `siblings.len() - 1` down to 0, so the sibling nearest the leaf
/// pairs with the deepest bit the proof covers and the last sibling with
/// the root's bit.
pub fn verify_sparse_proof(
    key: &str,
    leaf: &Sha256Hash,
    siblings: &[Sha256Hash],
    commitment: &Sha256Hash,
) -> Result<()> {
    if siblings.len() > 256 {
        return Err(Error::InvalidProof(format!(
            "sparse proof has {} siblings, tree depth is 256",
            siblings.len()
        )));
    }

    let bits = key_address_bits(key);
    let mut current = *leaf;

    for (i, sibling) in siblings.iter().enumerate() {
        let bit_index = siblings.len() - i - 1;
        current = if bits[bit_index] {
            hash_internal(sibling, &current)
        } else {
            hash_internal(&current, sibling)
        };
    }

    if &current != commitment {
        return Err(Error::HashMismatch {
            expected: commitment.to_hex(),
            actual: current.to_hex(),
        });
    }

    Ok(())
}

/// Hex-string form of [`verify_sparse_proof`] that fails closed
///
/// Malformed hex or any digest that does not decode to exactly 32 bytes
/// yields `false`.
pub fn verify_sparse_proof_hex(
    key: &str,
    leaf: &str,
    siblings: &[String],
    commitment: &str,
) -> bool {
    let decoded = (|| -> Result<_> {
        let leaf = Sha256Hash::from_hex(leaf)?;
        let commitment = Sha256Hash::from_hex(commitment)?;
        let siblings = siblings
            .iter()
            .map(|s| Sha256Hash::from_hex(s))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok((leaf, siblings, commitment))
    })();

    match decoded {
        Ok((leaf, siblings, commitment)) => {
            verify_sparse_proof(key, &leaf, &siblings, &commitment).is_ok()
        }
        Err(_) => false,
    }
}
