//! Typed indices used by the withdrawal machinery.
//!
//! Both indices are plain ``uint64`` on the wire. Keeping them as distinct types stops a
//! withdrawal counter from being used to index the validator registry and vice versa.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_index {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(
            Debug,
            Default,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Serialize,
            Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(#[serde(with = "serde_utils::quoted_u64")] pub u64);

        impl $name {
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            pub const fn as_u64(self) -> u64 {
                self.0
            }

            /// Position in a registry-sized list, or ``None`` where ``usize`` is narrower.
            pub fn to_usize(self) -> Option<usize> {
                usize::try_from(self.0).ok()
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for u64 {
            fn from(index: $name) -> Self {
                index.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ssz::Encode for $name {
            fn is_ssz_fixed_len() -> bool {
                <u64 as ssz::Encode>::is_ssz_fixed_len()
            }

            fn ssz_fixed_len() -> usize {
                <u64 as ssz::Encode>::ssz_fixed_len()
            }

            fn ssz_bytes_len(&self) -> usize {
                ssz::Encode::ssz_bytes_len(&self.0)
            }

            fn ssz_append(&self, buf: &mut Vec<u8>) {
                ssz::Encode::ssz_append(&self.0, buf)
            }
        }

        impl ssz::Decode for $name {
            fn is_ssz_fixed_len() -> bool {
                <u64 as ssz::Decode>::is_ssz_fixed_len()
            }

            fn ssz_fixed_len() -> usize {
                <u64 as ssz::Decode>::ssz_fixed_len()
            }

            fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, ssz::DecodeError> {
                <u64 as ssz::Decode>::from_ssz_bytes(bytes).map(Self)
            }
        }

        impl tree_hash::TreeHash for $name {
            fn tree_hash_type() -> tree_hash::TreeHashType {
                <u64 as tree_hash::TreeHash>::tree_hash_type()
            }

            fn tree_hash_packed_encoding(&self) -> tree_hash::PackedEncoding {
                tree_hash::TreeHash::tree_hash_packed_encoding(&self.0)
            }

            fn tree_hash_packing_factor() -> usize {
                <u64 as tree_hash::TreeHash>::tree_hash_packing_factor()
            }

            fn tree_hash_root(&self) -> tree_hash::Hash256 {
                tree_hash::TreeHash::tree_hash_root(&self.0)
            }
        }
    };
}

define_index!(
    /// Position of a validator in the registry.
    ValidatorIndex
);

define_index!(
    /// Global, strictly increasing counter of withdrawals ever paid out.
    WithdrawalIndex
);

impl ValidatorIndex {
    /// Return ``(self + delta) % validator_count``, or ``None`` for an empty registry or on
    /// overflow.
    pub fn checked_add_wrapping(self, delta: u64, validator_count: usize) -> Option<Self> {
        let modulus = u64::try_from(validator_count).ok()?;
        self.0
            .checked_add(delta)?
            .checked_rem(modulus)
            .map(Self)
    }
}

impl WithdrawalIndex {
    /// Return the index following ``self``, or ``None`` on overflow.
    pub fn checked_next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use ssz::{Decode, Encode};
    use tree_hash::TreeHash;

    use super::*;

    #[rstest]
    #[case(10, 80, 128, Some(90))]
    #[case(100, 80, 128, Some(52))]
    #[case(127, 1, 128, Some(0))]
    #[case(5, 80, 0, None)]
    #[case(u64::MAX, 1, 128, None)]
    fn test_checked_add_wrapping(
        #[case] start: u64,
        #[case] delta: u64,
        #[case] validator_count: usize,
        #[case] expected: Option<u64>,
    ) {
        assert_eq!(
            ValidatorIndex(start).checked_add_wrapping(delta, validator_count),
            expected.map(ValidatorIndex)
        );
    }

    #[test]
    fn test_to_usize_is_lossless() {
        assert_eq!(ValidatorIndex(7).to_usize(), Some(7));
        assert_eq!(
            ValidatorIndex(u64::MAX).to_usize(),
            usize::try_from(u64::MAX).ok()
        );
    }

    #[test]
    fn test_withdrawal_index_checked_next() {
        assert_eq!(WithdrawalIndex(21).checked_next(), Some(WithdrawalIndex(22)));
        assert_eq!(WithdrawalIndex(u64::MAX).checked_next(), None);
    }

    #[test]
    fn test_encodings_match_u64() {
        let index = ValidatorIndex(0x0102_0304_0506_0708);

        assert_eq!(index.as_ssz_bytes(), index.0.as_ssz_bytes());
        assert_eq!(index.tree_hash_root(), index.0.tree_hash_root());
        assert_eq!(
            ValidatorIndex::from_ssz_bytes(&index.as_ssz_bytes()).unwrap(),
            index
        );
        assert_eq!(
            serde_json::to_string(&index).unwrap(),
            format!("\"{}\"", index.0)
        );
    }
}
