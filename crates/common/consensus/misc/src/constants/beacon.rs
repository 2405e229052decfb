pub const FAR_FUTURE_EPOCH: u64 = 18446744073709551615;

// Withdrawal prefixes
pub const BLS_WITHDRAWAL_PREFIX: &[u8] = &[0];
pub const COMPOUNDING_WITHDRAWAL_PREFIX: &[u8] = &[2];
pub const ETH1_ADDRESS_WITHDRAWAL_PREFIX: &[u8] = &[1];

// Gwei values
pub const MIN_ACTIVATION_BALANCE: u64 = 32_000_000_000;

// Execution
/// Wire bound of the withdrawals list carried by an execution payload. Presets may configure a
/// smaller ``MAX_WITHDRAWALS_PER_PAYLOAD`` but never a larger one.
pub const MAX_WITHDRAWALS_PER_PAYLOAD_LIMIT: u64 = 16;
