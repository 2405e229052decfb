use alloy_primitives::B256;

use crate::{
    execution_payload::ExecutionPayload,
    execution_payload_header::ExecutionPayloadHeader,
    state_transition::withdrawals::{commitment::withdrawals_root, errors::WithdrawalError},
    withdrawal::Withdrawal,
};

/// The view of an execution payload that withdrawal processing needs.
///
/// A full payload carries its withdrawals; a blinded payload only carries their root.
pub trait ExecutionWithdrawals {
    fn is_blinded(&self) -> bool;

    /// The withdrawal list, or ``None`` when the payload is blinded.
    fn withdrawals(&self) -> Option<&[Withdrawal]>;

    /// Root committing to the withdrawal list, as a list bounded by
    /// ``max_withdrawals_per_payload``.
    fn withdrawals_root(&self, max_withdrawals_per_payload: usize) -> Result<B256, WithdrawalError>;
}

impl ExecutionWithdrawals for ExecutionPayload {
    fn is_blinded(&self) -> bool {
        false
    }

    fn withdrawals(&self) -> Option<&[Withdrawal]> {
        Some(&self.withdrawals)
    }

    fn withdrawals_root(
        &self,
        max_withdrawals_per_payload: usize,
    ) -> Result<B256, WithdrawalError> {
        withdrawals_root(&self.withdrawals, max_withdrawals_per_payload)
    }
}

impl ExecutionWithdrawals for ExecutionPayloadHeader {
    fn is_blinded(&self) -> bool {
        true
    }

    fn withdrawals(&self) -> Option<&[Withdrawal]> {
        None
    }

    fn withdrawals_root(
        &self,
        _max_withdrawals_per_payload: usize,
    ) -> Result<B256, WithdrawalError> {
        Ok(self.withdrawals_root)
    }
}
