use alloy_primitives::B256;
use ream_merkle::{merkleize_with_limit, mix_in_length};
use tree_hash::TreeHash;

use super::errors::WithdrawalError;
use crate::withdrawal::Withdrawal;

/// Hash tree root of ``withdrawals`` as an SSZ list bounded by ``max_withdrawals_per_payload``.
///
/// Takes the bound at runtime so presets with a smaller payload limit than the wire type still
/// commit to the right tree shape.
pub fn withdrawals_root(
    withdrawals: &[Withdrawal],
    max_withdrawals_per_payload: usize,
) -> Result<B256, WithdrawalError> {
    let leaves = withdrawals
        .iter()
        .map(TreeHash::tree_hash_root)
        .collect::<Vec<_>>();
    let root = merkleize_with_limit(&leaves, max_withdrawals_per_payload)?;
    Ok(mix_in_length(root, withdrawals.len()))
}

#[cfg(test)]
mod tests {
    use alloy_primitives::Address;
    use ream_consensus_misc::index::{ValidatorIndex, WithdrawalIndex};
    use ssz_types::{VariableList, typenum::U16};

    use super::*;

    fn withdrawals(count: u64) -> Vec<Withdrawal> {
        (0..count)
            .map(|index| Withdrawal {
                index: WithdrawalIndex(100 + index),
                validator_index: ValidatorIndex(index * 3),
                address: Address::repeat_byte(index as u8),
                amount: 1_000_000 * (index + 1),
            })
            .collect()
    }

    #[test]
    fn test_matches_ssz_list_root() {
        for count in [0, 1, 2, 5, 16] {
            let withdrawals = withdrawals(count);
            let list = VariableList::<Withdrawal, U16>::new(withdrawals.clone()).unwrap();

            assert_eq!(
                withdrawals_root(&withdrawals, 16).unwrap(),
                list.tree_hash_root(),
                "root mismatch for {count} withdrawals"
            );
        }
    }

    #[test]
    fn test_limit_changes_root() {
        let withdrawals = withdrawals(2);
        assert_ne!(
            withdrawals_root(&withdrawals, 4).unwrap(),
            withdrawals_root(&withdrawals, 16).unwrap()
        );
    }

    #[test]
    fn test_order_changes_root() {
        let mut withdrawals = withdrawals(3);
        let root = withdrawals_root(&withdrawals, 16).unwrap();
        withdrawals.swap(0, 2);
        assert_ne!(withdrawals_root(&withdrawals, 16).unwrap(), root);
    }

    #[test]
    fn test_more_withdrawals_than_limit_fails() {
        assert!(matches!(
            withdrawals_root(&withdrawals(5), 4),
            Err(WithdrawalError::Merkleization(_))
        ));
    }
}
