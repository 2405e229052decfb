use ream_consensus_misc::index::{ValidatorIndex, WithdrawalIndex};
use ream_network_spec::networks::BeaconNetworkSpec;

use super::{errors::WithdrawalError, expected::ExpectedWithdrawals};
use crate::beacon_state::traits::HasWithdrawalCursors;

/// The two withdrawal cursors of the state, read and written together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawalCursors {
    pub next_withdrawal_index: WithdrawalIndex,
    pub next_withdrawal_validator_index: ValidatorIndex,
}

impl WithdrawalCursors {
    pub fn read<S: HasWithdrawalCursors + ?Sized>(state: &S) -> Result<Self, WithdrawalError> {
        Ok(Self {
            next_withdrawal_index: state.next_withdrawal_index()?,
            next_withdrawal_validator_index: state.next_withdrawal_validator_index()?,
        })
    }

    pub fn write<S: HasWithdrawalCursors + ?Sized>(
        self,
        state: &mut S,
    ) -> Result<(), WithdrawalError> {
        state.set_next_withdrawal_index(self.next_withdrawal_index)?;
        state.set_next_withdrawal_validator_index(self.next_withdrawal_validator_index)
    }

    /// Cursors after ``expected_withdrawals`` have been paid.
    ///
    /// A full payload resumes the sweep right after the last validator the sweep withdrew from.
    /// Otherwise the sweep window was exhausted and the cursor jumps a whole window ahead. Queue
    /// withdrawals never move the sweep cursor, so a payload filled by the queue alone leaves it
    /// where it was.
    pub fn advance(
        self,
        expected_withdrawals: &ExpectedWithdrawals,
        validator_count: usize,
        spec: &BeaconNetworkSpec,
    ) -> Result<Self, WithdrawalError> {
        let next_withdrawal_index = match expected_withdrawals.last() {
            Some(withdrawal) => withdrawal
                .index
                .checked_next()
                .ok_or(WithdrawalError::WithdrawalIndexOverflow)?,
            None => self.next_withdrawal_index,
        };

        let payload_is_full = expected_withdrawals.len() as u64 == spec.max_withdrawals_per_payload;
        let next_withdrawal_validator_index = match expected_withdrawals.last_swept() {
            Some(withdrawal) if payload_is_full => withdrawal
                .validator_index
                .checked_add_wrapping(1, validator_count),
            // The queue filled the payload before the sweep inspected any validator.
            None if payload_is_full => self
                .next_withdrawal_validator_index
                .checked_add_wrapping(0, validator_count),
            _ => self.next_withdrawal_validator_index.checked_add_wrapping(
                spec.max_validators_per_withdrawals_sweep,
                validator_count,
            ),
        }
        .ok_or(WithdrawalError::CursorOverflow)?;

        Ok(Self {
            next_withdrawal_index,
            next_withdrawal_validator_index,
        })
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::Address;
    use ream_network_spec::networks::MINIMAL;
    use rstest::rstest;

    use super::*;
    use crate::{
        state_transition::withdrawals::expected::{ExpectedWithdrawal, WithdrawalKind},
        withdrawal::Withdrawal,
    };

    fn expected(validator_indices: &[u64], first_index: u64) -> ExpectedWithdrawals {
        ExpectedWithdrawals {
            withdrawals: validator_indices
                .iter()
                .zip(first_index..)
                .map(|(validator_index, index)| ExpectedWithdrawal {
                    withdrawal: Withdrawal {
                        index: WithdrawalIndex(index),
                        validator_index: ValidatorIndex(*validator_index),
                        address: Address::ZERO,
                        amount: 1,
                    },
                    kind: WithdrawalKind::Full,
                })
                .collect(),
            ..Default::default()
        }
    }

    fn cursors(
        next_withdrawal_index: u64,
        next_withdrawal_validator_index: u64,
    ) -> WithdrawalCursors {
        WithdrawalCursors {
            next_withdrawal_index: WithdrawalIndex(next_withdrawal_index),
            next_withdrawal_validator_index: ValidatorIndex(next_withdrawal_validator_index),
        }
    }

    #[rstest]
    #[case::empty_sweep_jumps_a_window(cursors(7, 10), &[], 20, cursors(7, 6))]
    #[case::partial_payload_jumps_a_window(cursors(7, 3), &[5, 9], 100, cursors(9, 19))]
    #[case::full_payload_resumes_after_last_validator(
        cursors(0, 8),
        &[8, 9, 0, 1],
        10,
        cursors(4, 2)
    )]
    #[case::full_payload_wraps_at_end_of_registry(cursors(0, 6), &[6, 7, 8, 9], 10, cursors(4, 0))]
    fn test_advance(
        #[case] current: WithdrawalCursors,
        #[case] withdrawn_validators: &[u64],
        #[case] validator_count: usize,
        #[case] next: WithdrawalCursors,
    ) {
        let expected_withdrawals =
            expected(withdrawn_validators, current.next_withdrawal_index.as_u64());
        assert_eq!(
            current
                .advance(&expected_withdrawals, validator_count, &MINIMAL)
                .unwrap(),
            next
        );
    }

    #[test]
    fn test_full_payload_of_queue_withdrawals_keeps_sweep_cursor() {
        let mut expected_withdrawals = expected(&[1, 2, 3, 4], 0);
        for expected_withdrawal in &mut expected_withdrawals.withdrawals {
            expected_withdrawal.kind = WithdrawalKind::PendingPartial;
        }

        assert_eq!(
            cursors(0, 0)
                .advance(&expected_withdrawals, 10, &MINIMAL)
                .unwrap(),
            cursors(4, 0)
        );
    }

    #[test]
    fn test_full_payload_resumes_after_last_swept_validator() {
        let mut expected_withdrawals = expected(&[1, 7, 2, 3], 0);
        expected_withdrawals.withdrawals[0].kind = WithdrawalKind::PendingPartial;
        expected_withdrawals.withdrawals[1].kind = WithdrawalKind::PendingPartial;

        assert_eq!(
            cursors(0, 2)
                .advance(&expected_withdrawals, 10, &MINIMAL)
                .unwrap(),
            cursors(4, 4)
        );
    }

    #[test]
    fn test_empty_registry_overflows() {
        assert!(matches!(
            cursors(0, 0).advance(&ExpectedWithdrawals::default(), 0, &MINIMAL),
            Err(WithdrawalError::CursorOverflow)
        ));
    }
}
