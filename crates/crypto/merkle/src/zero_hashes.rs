use std::sync::LazyLock;

use alloy_primitives::B256;

use crate::hash_concat;

/// Deepest tree a list limit representable in a `u64` can require.
pub const MAX_TREE_DEPTH: usize = 64;

/// ``ZERO_HASHES[i]`` is the root of a perfect binary tree of depth ``i`` whose leaves are all
/// zero chunks.
static ZERO_HASHES: LazyLock<[B256; MAX_TREE_DEPTH + 1]> = LazyLock::new(|| {
    let mut hashes = [B256::ZERO; MAX_TREE_DEPTH + 1];
    for depth in 1..=MAX_TREE_DEPTH {
        hashes[depth] = hash_concat(hashes[depth - 1].as_slice(), hashes[depth - 1].as_slice());
    }
    hashes
});

/// Return the root of an all-zero subtree of ``depth``.
///
/// ``depth`` is clamped to [`MAX_TREE_DEPTH`].
pub fn zero_hash(depth: usize) -> B256 {
    ZERO_HASHES[depth.min(MAX_TREE_DEPTH)]
}
