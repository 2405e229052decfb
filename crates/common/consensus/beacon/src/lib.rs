#![warn(clippy::unwrap_used)]

pub mod beacon_state;
pub mod execution_payload;
pub mod execution_payload_header;
pub mod execution_withdrawals;
pub mod pending_partial_withdrawal;
pub mod state_transition;
pub mod withdrawal;
