use std::cmp::min;

use alloy_primitives::B256;
use ream_consensus_misc::{
    index::{ValidatorIndex, WithdrawalIndex},
    misc::compute_epoch_at_slot,
};
use ream_network_spec::networks::BeaconNetworkSpec;
use tracing::trace;

use super::{commitment::withdrawals_root, errors::WithdrawalError};
use crate::{beacon_state::traits::WithdrawalState, withdrawal::Withdrawal};

/// Which rule selected a withdrawal. Decides how the balance is debited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WithdrawalKind {
    /// Paid from the pending partial withdrawal queue.
    PendingPartial,
    /// Sweep payout of the balance above ``principal_balance``.
    Partial,
    /// Sweep payout of the whole balance.
    Full,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedWithdrawal {
    pub withdrawal: Withdrawal,
    pub kind: WithdrawalKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpectedWithdrawals {
    /// Queue withdrawals first, then sweep withdrawals, with consecutive indices.
    pub withdrawals: Vec<ExpectedWithdrawal>,
    /// Queue entries visited, paid or skipped. This many entries are dequeued.
    pub processed_partial_withdrawals_count: u64,
    /// Queue entries that produced a withdrawal.
    pub paid_partial_withdrawals_count: u64,
}

impl ExpectedWithdrawals {
    pub fn len(&self) -> usize {
        self.withdrawals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.withdrawals.is_empty()
    }

    pub fn last(&self) -> Option<&Withdrawal> {
        self.withdrawals
            .last()
            .map(|expected_withdrawal| &expected_withdrawal.withdrawal)
    }

    /// Last withdrawal selected by the validator sweep, ignoring queue withdrawals.
    pub fn last_swept(&self) -> Option<&Withdrawal> {
        self.withdrawals
            .iter()
            .rev()
            .find(|expected_withdrawal| expected_withdrawal.kind != WithdrawalKind::PendingPartial)
            .map(|expected_withdrawal| &expected_withdrawal.withdrawal)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Withdrawal> {
        self.withdrawals
            .iter()
            .map(|expected_withdrawal| &expected_withdrawal.withdrawal)
    }

    pub fn to_withdrawals(&self) -> Vec<Withdrawal> {
        self.iter().cloned().collect()
    }

    pub fn withdrawals_root(
        &self,
        max_withdrawals_per_payload: usize,
    ) -> Result<B256, WithdrawalError> {
        withdrawals_root(&self.to_withdrawals(), max_withdrawals_per_payload)
    }

    fn push(
        &mut self,
        kind: WithdrawalKind,
        withdrawal: Withdrawal,
    ) -> Result<WithdrawalIndex, WithdrawalError> {
        let next_index = withdrawal
            .index
            .checked_next()
            .ok_or(WithdrawalError::WithdrawalIndexOverflow)?;
        trace!(
            "Selected {kind:?} withdrawal {} of {} Gwei for validator {}",
            withdrawal.index, withdrawal.amount, withdrawal.validator_index
        );
        self.withdrawals.push(ExpectedWithdrawal { withdrawal, kind });
        Ok(next_index)
    }

    /// Balance of ``validator_index`` after the withdrawals already selected for it.
    fn remaining_balance<S: WithdrawalState + ?Sized>(
        &self,
        state: &S,
        validator_index: ValidatorIndex,
    ) -> Result<u64, WithdrawalError> {
        let balance = state.balance_at(validator_index)?;
        let withdrawn = self
            .iter()
            .filter(|withdrawal| withdrawal.validator_index == validator_index)
            .fold(0u64, |total, withdrawal| {
                total.saturating_add(withdrawal.amount)
            });
        balance
            .checked_sub(withdrawn)
            .ok_or(WithdrawalError::BalanceUnderflow {
                validator_index,
                balance,
                delta: withdrawn,
            })
    }
}

/// Select the withdrawals the next execution payload must carry.
///
/// Pending partial withdrawals whose epoch has come are paid first, then the validator sweep
/// continues from ``next_withdrawal_validator_index``. Reads the state only.
pub fn get_expected_withdrawals<S: WithdrawalState + ?Sized>(
    state: &S,
    spec: &BeaconNetworkSpec,
) -> Result<ExpectedWithdrawals, WithdrawalError> {
    let fork = state.fork_name();
    if !fork.supports_withdrawals() {
        return Err(WithdrawalError::UnsupportedFork { fork });
    }

    let mut expected_withdrawals = ExpectedWithdrawals::default();
    let validator_count = state.num_validators();
    if validator_count == 0 {
        return Ok(expected_withdrawals);
    }

    let epoch = compute_epoch_at_slot(state.slot(), spec.slots_per_epoch);
    let max_withdrawals_per_payload =
        usize::try_from(spec.max_withdrawals_per_payload).unwrap_or(usize::MAX);
    let mut withdrawal_index = state.next_withdrawal_index()?;

    // [New in Electra:EIP7251] Consume pending partial withdrawals
    if let Some(pending_partial_withdrawals) = state.pending_partial_withdrawals() {
        let mut pending_balance_paid = 0u64;
        for pending_withdrawal in pending_partial_withdrawals {
            if pending_withdrawal.withdrawable_epoch > epoch
                || expected_withdrawals.len() as u64
                    == spec.max_pending_partials_per_withdrawals_sweep
                || pending_balance_paid >= spec.max_pending_partials_balance_per_sweep
            {
                break;
            }

            let validator_index = pending_withdrawal.validator_index;
            let validator = state.validator_at(validator_index)?;
            let balance = expected_withdrawals.remaining_balance(state, validator_index)?;
            if !validator.has_initiated_exit()
                && validator.effective_balance >= spec.min_activation_balance
                && balance > spec.min_activation_balance
            {
                let amount = min(
                    balance - spec.min_activation_balance,
                    pending_withdrawal.amount,
                );
                withdrawal_index = expected_withdrawals.push(
                    WithdrawalKind::PendingPartial,
                    Withdrawal {
                        index: withdrawal_index,
                        validator_index,
                        address: validator.withdrawal_address(),
                        amount,
                    },
                )?;
                pending_balance_paid = pending_balance_paid.saturating_add(amount);
                expected_withdrawals.paid_partial_withdrawals_count += 1;
            }
            expected_withdrawals.processed_partial_withdrawals_count += 1;
        }
    }

    // Sweep for remaining
    let bound = min(
        validator_count,
        usize::try_from(spec.max_validators_per_withdrawals_sweep).unwrap_or(usize::MAX),
    );
    let mut validator_index = state.next_withdrawal_validator_index()?;
    for _ in 0..bound {
        if expected_withdrawals.len() >= max_withdrawals_per_payload {
            break;
        }

        let validator = state.validator_at(validator_index)?;
        let balance = expected_withdrawals.remaining_balance(state, validator_index)?;
        let payout = if validator.is_fully_withdrawable_validator(balance, epoch) {
            Some((WithdrawalKind::Full, balance))
        } else if validator.is_partially_withdrawable_validator(balance) {
            Some((
                WithdrawalKind::Partial,
                balance - validator.principal_balance,
            ))
        } else {
            None
        };
        if let Some((kind, amount)) = payout {
            withdrawal_index = expected_withdrawals.push(
                kind,
                Withdrawal {
                    index: withdrawal_index,
                    validator_index,
                    address: validator.withdrawal_address(),
                    amount,
                },
            )?;
        }

        validator_index = validator_index
            .checked_add_wrapping(1, validator_count)
            .ok_or(WithdrawalError::CursorOverflow)?;
    }

    Ok(expected_withdrawals)
}
