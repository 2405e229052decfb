use super::{
    errors::WithdrawalError,
    expected::{ExpectedWithdrawal, WithdrawalKind},
};
use crate::beacon_state::traits::HasBalances;

/// Debit the balance of the withdrawn validator by the withdrawal amount.
///
/// Partial payouts go through the principal-adjusting path; full exits only debit the balance.
pub fn apply_withdrawal<S: HasBalances + ?Sized>(
    state: &mut S,
    expected_withdrawal: &ExpectedWithdrawal,
) -> Result<(), WithdrawalError> {
    let withdrawal = &expected_withdrawal.withdrawal;
    match expected_withdrawal.kind {
        WithdrawalKind::PendingPartial | WithdrawalKind::Partial => state
            .decrease_balance_and_adjust_principal_balance(
                withdrawal.validator_index,
                withdrawal.amount,
            ),
        WithdrawalKind::Full => {
            state.decrease_balance(withdrawal.validator_index, withdrawal.amount)
        }
    }
}
