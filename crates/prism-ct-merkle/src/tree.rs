//! RFC 6962 Merkle tree hashing
//!
//! Domain separation via prefixes (0x00 for leaves, 0x01 for interior
//! nodes), SHA-256 throughout.

use prism_ct_types::Sha256Hash;
use sha2::{Digest, Sha256};

/// Prefix for leaf nodes in RFC 6962 Merkle tree
pub const LEAF_HASH_PREFIX: u8 = 0x00;

/// Prefix for internal nodes in RFC 6962 Merkle tree
pub const NODE_HASH_PREFIX: u8 = 0x01;

/// Hash size in bytes (SHA-256)
pub const HASH_SIZE: usize = 32;

/// Hash a leaf node
///
/// Returns: SHA256(0x00 || leaf_data)
pub fn hash_leaf(data: &[u8]) -> Sha256Hash {
    let mut hasher = Sha256::new();
    hasher.update([LEAF_HASH_PREFIX]);
    hasher.update(data);
    Sha256Hash::from_bytes(hasher.finalize().into())
}

/// Hash two child nodes to create a parent node
///
/// Returns: SHA256(0x01 || left || right)
pub fn hash_children(left: &Sha256Hash, right: &Sha256Hash) -> Sha256Hash {
    let mut hasher = Sha256::new();
    hasher.update([NODE_HASH_PREFIX]);
    hasher.update(left.as_bytes());
    hasher.update(right.as_bytes());
    Sha256Hash::from_bytes(hasher.finalize().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_leaf_is_domain_separated() {
        let data = b"test data";
        let hash = hash_leaf(data);

        let raw: [u8; HASH_SIZE] = Sha256::digest(data).into();
        assert_ne!(hash.as_bytes(), &raw);
    }

    #[test]
    fn test_hash_children_order_matters() {
        let left = Sha256Hash::from_bytes([0u8; 32]);
        let right = Sha256Hash::from_bytes([1u8; 32]);

        assert_ne!(hash_children(&left, &right), hash_children(&right, &left));
    }

    #[test]
    fn test_hash_children_known_value() {
        // SHA256(0x01 || 0^32 || 0^32)
        let zero = Sha256Hash::from_bytes([0u8; 32]);
        let mut preimage = vec![NODE_HASH_PREFIX];
        preimage.extend_from_slice(&[0u8; 64]);
        let expected: [u8; HASH_SIZE] = Sha256::digest(&preimage).into();

        assert_eq!(hash_children(&zero, &zero).as_bytes(), &expected);
    }
}
