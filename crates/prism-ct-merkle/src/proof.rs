//! CT audit path verification
//!
//! Two algorithms live here. [`verify_audit_path`] is the index-parity walk
//! the deployed verifier uses: it knows nothing about the tree size, so a
//! leaf on the right edge of a tree whose size is not a power of two will
//! not verify against a genuine RFC 6962 proof. [`verify_inclusion_proof`]
//! is the full RFC 6962 algorithm and handles those promoted nodes.

use crate::error::{Error, Result};
use crate::tree::hash_children;
use prism_ct_types::Sha256Hash;

/// Verify an audit path by index parity alone
///
/// Starting from `leaf_hash`, each sibling is combined on the left when the
/// running index is odd and on the right when it is even, halving the index
/// after every step. The result must equal `expected_root` exactly.
///
/// # Arguments
/// * `leaf_hash` - The hash of the leaf entry
/// * `leaf_index` - Index of the leaf in the tree (0-based)
/// * `path` - Sibling hashes, leaf to root
/// * `expected_root` - The expected root hash to verify against
pub fn verify_audit_path(
    leaf_hash: &Sha256Hash,
    leaf_index: u64,
    path: &[Sha256Hash],
    expected_root: &Sha256Hash,
) -> Result<()> {
    let mut hash = *leaf_hash;
    let mut index = leaf_index;

    for sibling in path {
        if index % 2 == 1 {
            hash = hash_children(sibling, &hash);
        } else {
            hash = hash_children(&hash, sibling);
        }
        index /= 2;
    }

    if &hash != expected_root {
        return Err(Error::HashMismatch {
            expected: expected_root.to_hex(),
            actual: hash.to_hex(),
        });
    }

    Ok(())
}

/// Boolean form of [`verify_audit_path`]
pub fn audit_path_holds(
    leaf_hash: &Sha256Hash,
    leaf_index: u64,
    path: &[Sha256Hash],
    expected_root: &Sha256Hash,
) -> bool {
    verify_audit_path(leaf_hash, leaf_index, path, expected_root).is_ok()
}

/// Verify an inclusion proof for a leaf in a tree of known size (RFC 6962)
///
/// # Arguments
/// * `leaf_hash` - The hash of the leaf entry
/// * `leaf_index` - Index of the leaf in the tree (0-based)
/// * `tree_size` - Total number of leaves in the tree
/// * `proof_hashes` - The hashes in the inclusion proof path
/// * `expected_root` - The expected root hash to verify against
pub fn verify_inclusion_proof(
    leaf_hash: &Sha256Hash,
    leaf_index: u64,
    tree_size: u64,
    proof_hashes: &[Sha256Hash],
    expected_root: &Sha256Hash,
) -> Result<()> {
    if tree_size == 0 {
        return Err(Error::InvalidTreeSize(
            "tree size cannot be zero".to_string(),
        ));
    }

    if leaf_index >= tree_size {
        return Err(Error::InvalidLeafIndex(format!(
            "leaf index {} >= tree size {}",
            leaf_index, tree_size
        )));
    }

    let expected_proof_len = expected_inclusion_proof_length(leaf_index, tree_size);
    if proof_hashes.len() != expected_proof_len {
        return Err(Error::InvalidProof(format!(
            "expected {} proof hashes for leaf {} in tree of size {}, got {}",
            expected_proof_len,
            leaf_index,
            tree_size,
            proof_hashes.len()
        )));
    }

    let mut hash = *leaf_hash;
    let mut index = leaf_index;
    let mut last_node = tree_size - 1;

    for proof_hash in proof_hashes {
        // A right child, or the rightmost node of a level that was promoted
        // without a sibling, takes the proof hash on the left.
        if index % 2 == 1 || index == last_node {
            hash = hash_children(proof_hash, &hash);
        } else {
            hash = hash_children(&hash, proof_hash);
        }
        index /= 2;
        last_node /= 2;
    }

    if &hash != expected_root {
        return Err(Error::HashMismatch {
            expected: expected_root.to_hex(),
            actual: hash.to_hex(),
        });
    }

    Ok(())
}

/// Number of proof hashes RFC 6962 produces for a leaf
///
/// Leaves on the right edge of a tree whose size is not a power of two are
/// promoted past levels where they have no sibling, so their proofs are
/// shorter.
fn expected_inclusion_proof_length(leaf_index: u64, tree_size: u64) -> usize {
    let mut count = 0;
    let mut index = leaf_index;
    let mut size = tree_size;

    while size > 1 {
        if !(size % 2 == 1 && index == size - 1) {
            count += 1;
        }
        index /= 2;
        size = (size + 1) / 2;
    }

    count
}
