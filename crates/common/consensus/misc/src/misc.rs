use alloy_primitives::B256;

use crate::constants::beacon::{COMPOUNDING_WITHDRAWAL_PREFIX, ETH1_ADDRESS_WITHDRAWAL_PREFIX};

pub mod checksummed_address {
    use alloy_primitives::Address;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S>(address: &Address, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let checksummed = address.to_checksum(None);
        serializer.serialize_str(&checksummed)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Address, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        s.parse::<Address>().map_err(D::Error::custom)
    }
}

/// Return the epoch number at ``slot``.
///
/// ``slots_per_epoch`` comes from a validated network spec and is never zero.
pub fn compute_epoch_at_slot(slot: u64, slots_per_epoch: u64) -> u64 {
    slot / slots_per_epoch
}

/// Check if ``withdrawal_credentials`` is a 0x01 prefixed "eth1" withdrawal credential.
pub fn is_eth1_withdrawal_credential(withdrawal_credentials: B256) -> bool {
    &withdrawal_credentials[..1] == ETH1_ADDRESS_WITHDRAWAL_PREFIX
}

/// Check if ``withdrawal_credentials`` is a compounding withdrawal credential.
pub fn is_compounding_withdrawal_credential(withdrawal_credentials: B256) -> bool {
    &withdrawal_credentials[..1] == COMPOUNDING_WITHDRAWAL_PREFIX
}
