//! https://github.com/ethereum/consensus-specs/blob/dev/ssz/simple-serialize.md#merkleization

use alloy_primitives::B256;
use anyhow::{anyhow, ensure};

mod zero_hashes;

pub use zero_hashes::{MAX_TREE_DEPTH, zero_hash};

/// Common hashing function for Merkle trees.
pub(crate) fn hash_concat(h1: &[u8], h2: &[u8]) -> B256 {
    ethereum_hashing::hash32_concat(h1, h2).into()
}

/// Return the depth of the tree needed to hold ``limit`` leaves.
pub fn tree_depth_for_limit(limit: usize) -> anyhow::Result<usize> {
    let bottom_length = limit
        .checked_next_power_of_two()
        .ok_or_else(|| anyhow!("List limit {limit} is too large to merkleize"))?;
    Ok(bottom_length.trailing_zeros() as usize)
}

/// Merkleize ``leaves`` as the chunks of a list bounded by ``limit``.
///
/// The tree is padded with zero chunks up to ``next_pow_of_two(limit)`` leaves, so the shape
/// depends only on ``limit`` and never on the number of leaves actually present.
pub fn merkleize_with_limit(leaves: &[B256], limit: usize) -> anyhow::Result<B256> {
    ensure!(
        leaves.len() <= limit,
        "Number of leaves ({}) exceeds the list limit ({limit})",
        leaves.len()
    );
    let depth = tree_depth_for_limit(limit)?;

    if leaves.is_empty() {
        return Ok(zero_hash(depth));
    }

    let mut layer = leaves.to_vec();
    for height in 0..depth {
        if layer.len() % 2 == 1 {
            layer.push(zero_hash(height));
        }
        layer = layer
            .chunks_exact(2)
            .map(|pair| hash_concat(pair[0].as_slice(), pair[1].as_slice()))
            .collect();
    }

    layer
        .first()
        .copied()
        .ok_or_else(|| anyhow!("Merkleization produced an empty layer"))
}

/// Mix the ``length`` of a list into its data ``root``.
pub fn mix_in_length(root: B256, length: usize) -> B256 {
    let mut length_chunk = [0u8; 32];
    length_chunk[..8].copy_from_slice(&(length as u64).to_le_bytes());
    hash_concat(root.as_slice(), &length_chunk)
}
