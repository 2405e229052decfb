use alloy_primitives::B256;
use ream_consensus_misc::index::{ValidatorIndex, WithdrawalIndex};
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use ssz_types::serde_utils::quoted_u64_var_list;
use tree_hash_derive::TreeHash;

use super::{Balances, PendingPartialWithdrawals, Validators};
use crate::state_transition::withdrawals::errors::WithdrawalError;

/// State layout shared by Electra and Badger.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct BeaconStateElectra {
    // Versioning
    #[serde(with = "serde_utils::quoted_u64")]
    pub genesis_time: u64,
    pub genesis_validators_root: B256,
    #[serde(with = "serde_utils::quoted_u64")]
    pub slot: u64,

    // Registry
    pub validators: Validators,
    #[serde(with = "quoted_u64_var_list")]
    pub balances: Balances,

    // Withdrawals
    pub next_withdrawal_index: WithdrawalIndex,
    pub next_withdrawal_validator_index: ValidatorIndex,

    // Electra
    pub pending_partial_withdrawals: PendingPartialWithdrawals,
}

impl BeaconStateElectra {
    /// Drop the first ``count`` entries of the pending partial withdrawal queue.
    pub fn dequeue_partial_withdrawals(&mut self, count: u64) -> Result<(), WithdrawalError> {
        let length = self.pending_partial_withdrawals.len();
        let Some(remaining) = usize::try_from(count)
            .ok()
            .and_then(|count| self.pending_partial_withdrawals.get(count..))
        else {
            return Err(WithdrawalError::PendingQueueUnderflow { count, length });
        };

        self.pending_partial_withdrawals = PendingPartialWithdrawals::new(remaining.to_vec())
            .map_err(|err| WithdrawalError::Ssz(format!("{err:?}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pending_partial_withdrawal::PendingPartialWithdrawal;

    fn state_with_queue(length: u64) -> BeaconStateElectra {
        let queue = (0..length)
            .map(|index| PendingPartialWithdrawal {
                validator_index: ValidatorIndex(index),
                amount: 1_000_000_000,
                withdrawable_epoch: 0,
            })
            .collect::<Vec<_>>();
        BeaconStateElectra {
            pending_partial_withdrawals: PendingPartialWithdrawals::new(queue).unwrap(),
            ..Default::default()
        }
    }

    #[test]
    fn test_dequeue_keeps_tail_in_order() {
        let mut state = state_with_queue(5);
        state.dequeue_partial_withdrawals(2).unwrap();

        let remaining = state
            .pending_partial_withdrawals
            .iter()
            .map(|entry| entry.validator_index.as_u64())
            .collect::<Vec<_>>();
        assert_eq!(remaining, vec![2, 3, 4]);
    }

    #[test]
    fn test_dequeue_whole_queue() {
        let mut state = state_with_queue(3);
        state.dequeue_partial_withdrawals(3).unwrap();
        assert!(state.pending_partial_withdrawals.is_empty());
    }

    #[test]
    fn test_dequeue_more_than_queued_fails() {
        let mut state = state_with_queue(3);
        assert!(matches!(
            state.dequeue_partial_withdrawals(4),
            Err(WithdrawalError::PendingQueueUnderflow {
                count: 4,
                length: 3
            })
        ));
        assert_eq!(state.pending_partial_withdrawals.len(), 3);
    }
}
