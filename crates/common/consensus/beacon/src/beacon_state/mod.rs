pub mod base;
pub mod capella;
pub mod electra;
pub mod traits;

use alloy_primitives::B256;
use ream_consensus_misc::{fork_name::ForkName, misc::compute_epoch_at_slot, validator::Validator};
use ream_network_spec::networks::BeaconNetworkSpec;
use serde::{Deserialize, Serialize};
use ssz::{Decode, Encode};
use ssz_types::{
    VariableList,
    typenum::{U134217728, U1099511627776},
};
use tree_hash::TreeHash;

use self::{base::BeaconStateBase, capella::BeaconStateCapella, electra::BeaconStateElectra};
use crate::{
    execution_withdrawals::ExecutionWithdrawals,
    pending_partial_withdrawal::PendingPartialWithdrawal,
    state_transition::withdrawals::{
        self, errors::WithdrawalError, expected::ExpectedWithdrawals,
    },
};

pub type Validators = VariableList<Validator, U1099511627776>;
pub type Balances = VariableList<u64, U1099511627776>;
pub type PendingPartialWithdrawals = VariableList<PendingPartialWithdrawal, U134217728>;

/// Run ``$body`` against whichever layout ``$value`` holds, bound to ``$state``.
macro_rules! map_beacon_state {
    ($value:expr, $state:ident => $body:expr) => {
        match $value {
            BeaconState::Base($state)
            | BeaconState::Altair($state)
            | BeaconState::Bellatrix($state) => $body,
            BeaconState::Capella($state) | BeaconState::Deneb($state) => $body,
            BeaconState::Electra($state) | BeaconState::Badger($state) => $body,
        }
    };
}

pub(crate) use map_beacon_state;

/// A beacon state tagged with the protocol version it was produced under.
///
/// Versions that share a layout share a container; the variant alone decides which rules apply.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(tag = "version", content = "data", rename_all = "lowercase")]
pub enum BeaconState {
    Base(BeaconStateBase),
    Altair(BeaconStateBase),
    Bellatrix(BeaconStateBase),
    Capella(BeaconStateCapella),
    Deneb(BeaconStateCapella),
    Electra(BeaconStateElectra),
    Badger(BeaconStateElectra),
}

impl BeaconState {
    pub fn fork_name(&self) -> ForkName {
        match self {
            BeaconState::Base(_) => ForkName::Base,
            BeaconState::Altair(_) => ForkName::Altair,
            BeaconState::Bellatrix(_) => ForkName::Bellatrix,
            BeaconState::Capella(_) => ForkName::Capella,
            BeaconState::Deneb(_) => ForkName::Deneb,
            BeaconState::Electra(_) => ForkName::Electra,
            BeaconState::Badger(_) => ForkName::Badger,
        }
    }

    pub fn slot(&self) -> u64 {
        map_beacon_state!(self, state => state.slot)
    }

    /// Return the current epoch.
    pub fn get_current_epoch(&self, spec: &BeaconNetworkSpec) -> u64 {
        compute_epoch_at_slot(self.slot(), spec.slots_per_epoch)
    }

    pub fn as_ssz_bytes(&self) -> Vec<u8> {
        map_beacon_state!(self, state => state.as_ssz_bytes())
    }

    /// Decode ``bytes`` using the layout of ``fork``.
    pub fn from_ssz_bytes(bytes: &[u8], fork: ForkName) -> Result<Self, ssz::DecodeError> {
        Ok(match fork {
            ForkName::Base => BeaconState::Base(BeaconStateBase::from_ssz_bytes(bytes)?),
            ForkName::Altair => BeaconState::Altair(BeaconStateBase::from_ssz_bytes(bytes)?),
            ForkName::Bellatrix => {
                BeaconState::Bellatrix(BeaconStateBase::from_ssz_bytes(bytes)?)
            }
            ForkName::Capella => BeaconState::Capella(BeaconStateCapella::from_ssz_bytes(bytes)?),
            ForkName::Deneb => BeaconState::Deneb(BeaconStateCapella::from_ssz_bytes(bytes)?),
            ForkName::Electra => BeaconState::Electra(BeaconStateElectra::from_ssz_bytes(bytes)?),
            ForkName::Badger => BeaconState::Badger(BeaconStateElectra::from_ssz_bytes(bytes)?),
        })
    }

    pub fn tree_hash_root(&self) -> B256 {
        map_beacon_state!(self, state => state.tree_hash_root())
    }

    /// Compute the withdrawals the next execution payload must carry.
    pub fn get_expected_withdrawals(
        &self,
        spec: &BeaconNetworkSpec,
    ) -> Result<ExpectedWithdrawals, WithdrawalError> {
        withdrawals::expected::get_expected_withdrawals(self, spec)
    }

    /// Apply the withdrawals of ``payload``, returning the post-state.
    pub fn process_withdrawals<P: ExecutionWithdrawals + ?Sized>(
        self,
        payload: &P,
        spec: &BeaconNetworkSpec,
    ) -> Result<Self, WithdrawalError> {
        withdrawals::process_withdrawals(self, payload, spec)
    }
}
