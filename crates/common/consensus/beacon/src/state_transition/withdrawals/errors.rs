use alloy_primitives::B256;
use ream_consensus_misc::{fork_name::ForkName, index::ValidatorIndex};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WithdrawalError {
    #[error("Payload carries {actual} withdrawals, expected {expected}")]
    WithdrawalCountMismatch { expected: usize, actual: usize },

    #[error("Withdrawals root mismatch: expected {expected}, payload committed to {actual}")]
    WithdrawalRootMismatch { expected: B256, actual: B256 },

    #[error("Balance of validator {validator_index} is {balance}, cannot decrease it by {delta}")]
    BalanceUnderflow {
        validator_index: ValidatorIndex,
        balance: u64,
        delta: u64,
    },

    #[error("Pending partial withdrawal queue does not exist at fork {fork}")]
    QueueDequeueUnsupported { fork: ForkName },

    #[error("Cannot dequeue {count} entries from a pending partial withdrawal queue of {length}")]
    PendingQueueUnderflow { count: u64, length: usize },

    #[error("Next withdrawal validator index cannot be advanced")]
    CursorOverflow,

    #[error("Withdrawal index overflowed")]
    WithdrawalIndexOverflow,

    #[error("Withdrawals are not supported at fork {fork}")]
    UnsupportedFork { fork: ForkName },

    #[error("Validator index {validator_index} is out of bounds")]
    ValidatorIndexOutOfBounds { validator_index: ValidatorIndex },

    #[error("Failed to merkleize withdrawals: {0}")]
    Merkleization(#[from] anyhow::Error),

    #[error("SSZ list error: {0}")]
    Ssz(String),
}
