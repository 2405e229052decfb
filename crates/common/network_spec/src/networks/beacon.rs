use std::sync::{Arc, LazyLock};

use anyhow::ensure;
use ream_consensus_misc::constants::beacon::{
    MAX_WITHDRAWALS_PER_PAYLOAD_LIMIT, MIN_ACTIVATION_BALANCE,
};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Minimal,
    Custom(String),
}

impl<'de> Deserialize<'de> for Network {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match String::deserialize(deserializer)?.as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "minimal" => Ok(Network::Minimal),
            custom => Ok(Network::Custom(custom.to_string())),
        }
    }
}

/// Protocol parameters the withdrawal machinery reads.
///
/// The network spec is an immutable value passed by reference into every call that needs it. Tests
/// override individual parameters with struct update syntax instead of mutating shared state:
///
/// ```
/// use ream_network_spec::networks::{BeaconNetworkSpec, MAINNET};
///
/// let spec = BeaconNetworkSpec {
///     max_validators_per_withdrawals_sweep: 80,
///     ..(**MAINNET).clone()
/// };
/// assert!(spec.validate().is_ok());
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct BeaconNetworkSpec {
    pub preset_base: String,
    #[serde(rename = "CONFIG_NAME")]
    pub network: Network,

    // Time parameters
    pub slots_per_epoch: u64,

    // Gwei values
    pub min_activation_balance: u64,

    // Execution
    pub max_withdrawals_per_payload: u64,

    // Withdrawals processing
    pub max_validators_per_withdrawals_sweep: u64,
    pub max_pending_partials_per_withdrawals_sweep: u64,
    /// Upper bound on the Gwei paid out of the pending partial withdrawal queue in one block.
    pub max_pending_partials_balance_per_sweep: u64,
}

impl BeaconNetworkSpec {
    /// Reject parameter combinations the withdrawal sweep cannot work with.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.slots_per_epoch > 0,
            "SLOTS_PER_EPOCH must be greater than zero"
        );
        ensure!(
            self.max_withdrawals_per_payload > 0
                && self.max_withdrawals_per_payload <= MAX_WITHDRAWALS_PER_PAYLOAD_LIMIT,
            "MAX_WITHDRAWALS_PER_PAYLOAD must be between 1 and {MAX_WITHDRAWALS_PER_PAYLOAD_LIMIT}, got {}",
            self.max_withdrawals_per_payload
        );
        ensure!(
            self.max_validators_per_withdrawals_sweep > 0,
            "MAX_VALIDATORS_PER_WITHDRAWALS_SWEEP must be greater than zero"
        );
        ensure!(
            self.max_pending_partials_per_withdrawals_sweep < self.max_withdrawals_per_payload,
            "MAX_PENDING_PARTIALS_PER_WITHDRAWALS_SWEEP ({}) must be below MAX_WITHDRAWALS_PER_PAYLOAD ({})",
            self.max_pending_partials_per_withdrawals_sweep,
            self.max_withdrawals_per_payload
        );
        Ok(())
    }
}

pub static MAINNET: LazyLock<Arc<BeaconNetworkSpec>> = LazyLock::new(|| {
    BeaconNetworkSpec {
        preset_base: "mainnet".to_string(),
        network: Network::Mainnet,
        slots_per_epoch: 32,
        min_activation_balance: MIN_ACTIVATION_BALANCE,
        max_withdrawals_per_payload: 16,
        max_validators_per_withdrawals_sweep: 16384,
        max_pending_partials_per_withdrawals_sweep: 8,
        max_pending_partials_balance_per_sweep: u64::MAX,
    }
    .into()
});

pub static MINIMAL: LazyLock<Arc<BeaconNetworkSpec>> = LazyLock::new(|| {
    BeaconNetworkSpec {
        preset_base: "minimal".to_string(),
        network: Network::Minimal,
        slots_per_epoch: 8,
        min_activation_balance: MIN_ACTIVATION_BALANCE,
        max_withdrawals_per_payload: 4,
        max_validators_per_withdrawals_sweep: 16,
        max_pending_partials_per_withdrawals_sweep: 2,
        max_pending_partials_balance_per_sweep: u64::MAX,
    }
    .into()
});
