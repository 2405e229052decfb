//! Withdrawal processing for execution payloads.
//!
//! [get_expected_withdrawals](expected::get_expected_withdrawals) decides what a payload must
//! withdraw, [process_withdrawals] checks a payload against that and applies it to the state.

pub mod balance;
pub mod commitment;
pub mod cursor;
pub mod errors;
pub mod expected;

use std::sync::Arc;

use ream_network_spec::networks::BeaconNetworkSpec;
use tracing::{debug, warn};

use self::{
    balance::apply_withdrawal, cursor::WithdrawalCursors, errors::WithdrawalError,
    expected::get_expected_withdrawals,
};
use crate::{
    beacon_state::{BeaconState, traits::WithdrawalState},
    execution_withdrawals::ExecutionWithdrawals,
};

/// Verify the withdrawals of ``payload`` against the state and apply them.
///
/// Consumes the pre-state and returns the post-state. On error the state is dropped, so a
/// caller that needs to keep the pre-state passes a clone; see [process_withdrawals_staged].
pub fn process_withdrawals<S, P>(
    mut state: S,
    payload: &P,
    spec: &BeaconNetworkSpec,
) -> Result<S, WithdrawalError>
where
    S: WithdrawalState,
    P: ExecutionWithdrawals + ?Sized,
{
    let expected_withdrawals = get_expected_withdrawals(&state, spec)?;
    let max_withdrawals_per_payload =
        usize::try_from(spec.max_withdrawals_per_payload).unwrap_or(usize::MAX);

    if !payload.is_blinded()
        && let Some(withdrawals) = payload.withdrawals()
        && withdrawals.len() != expected_withdrawals.len()
    {
        warn!(
            "Payload withdrawal count mismatch: expected {}, got {}",
            expected_withdrawals.len(),
            withdrawals.len()
        );
        return Err(WithdrawalError::WithdrawalCountMismatch {
            expected: expected_withdrawals.len(),
            actual: withdrawals.len(),
        });
    }

    let expected_root = expected_withdrawals.withdrawals_root(max_withdrawals_per_payload)?;
    let payload_root = payload.withdrawals_root(max_withdrawals_per_payload)?;
    if expected_root != payload_root {
        warn!("Payload withdrawals root mismatch: expected {expected_root}, got {payload_root}");
        return Err(WithdrawalError::WithdrawalRootMismatch {
            expected: expected_root,
            actual: payload_root,
        });
    }

    let cursors = WithdrawalCursors::read(&state)?;
    let next_cursors = cursors.advance(&expected_withdrawals, state.num_validators(), spec)?;

    for expected_withdrawal in &expected_withdrawals.withdrawals {
        apply_withdrawal(&mut state, expected_withdrawal)?;
    }

    // Update pending partial withdrawals [New in Electra:EIP7251]
    if state.fork_name().supports_pending_partial_withdrawals() {
        state.dequeue_partial_withdrawals(
            expected_withdrawals.processed_partial_withdrawals_count,
        )?;
    }

    next_cursors.write(&mut state)?;

    debug!(
        "Processed {} withdrawals with root {expected_root} ({} from the pending queue, {} queue entries consumed), next withdrawal index {}, next withdrawal validator index {}",
        expected_withdrawals.len(),
        expected_withdrawals.paid_partial_withdrawals_count,
        expected_withdrawals.processed_partial_withdrawals_count,
        next_cursors.next_withdrawal_index,
        next_cursors.next_withdrawal_validator_index,
    );

    Ok(state)
}

/// Run [process_withdrawals] on a copy of ``canonical``.
///
/// The canonical state is never touched: on success the caller swaps in the returned state, on
/// failure it keeps using ``canonical``.
pub fn process_withdrawals_staged<P: ExecutionWithdrawals + ?Sized>(
    canonical: &Arc<BeaconState>,
    payload: &P,
    spec: &BeaconNetworkSpec,
) -> Result<Arc<BeaconState>, WithdrawalError> {
    process_withdrawals(BeaconState::clone(canonical), payload, spec).map(Arc::new)
}
