use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use ssz_types::{FixedVector, serde_utils::hex_fixed_vec, typenum::U48};
use tree_hash_derive::TreeHash;

use crate::{
    constants::beacon::FAR_FUTURE_EPOCH,
    misc::{is_compounding_withdrawal_credential, is_eth1_withdrawal_credential},
};

#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct Validator {
    #[serde(with = "hex_fixed_vec")]
    pub pubkey: FixedVector<u8, U48>,

    /// Commitment to pubkey for withdrawals
    pub withdrawal_credentials: B256,

    /// Balance at stake
    #[serde(with = "serde_utils::quoted_u64")]
    pub effective_balance: u64,
    pub slashed: bool,

    /// When criteria for activation were met
    #[serde(with = "serde_utils::quoted_u64")]
    pub activation_eligibility_epoch: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub activation_epoch: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub exit_epoch: u64,

    /// When validator can withdraw funds
    #[serde(with = "serde_utils::quoted_u64")]
    pub withdrawable_epoch: u64,

    /// Deposited stake, distinct from accrued rewards. Partial withdrawals skim the balance
    /// down to this floor.
    #[serde(with = "serde_utils::quoted_u64")]
    pub principal_balance: u64,
}

impl Validator {
    /// Check if ``validator`` has an 0x01 prefixed "eth1" withdrawal credential.
    pub fn has_eth1_withdrawal_credential(&self) -> bool {
        is_eth1_withdrawal_credential(self.withdrawal_credentials)
    }

    /// Check if ``validator`` has an 0x02 prefixed "compounding" withdrawal credential.
    pub fn has_compounding_withdrawal_credential(&self) -> bool {
        is_compounding_withdrawal_credential(self.withdrawal_credentials)
    }

    /// Check if ``validator`` has a 0x01 or 0x02 prefixed withdrawal credential.
    pub fn has_execution_withdrawal_credential(&self) -> bool {
        self.has_compounding_withdrawal_credential() || self.has_eth1_withdrawal_credential()
    }

    /// Execution address funds are paid out to.
    pub fn withdrawal_address(&self) -> Address {
        Address::from_slice(&self.withdrawal_credentials[12..])
    }

    pub fn has_initiated_exit(&self) -> bool {
        self.exit_epoch != FAR_FUTURE_EPOCH
    }

    /// Check if ``validator`` is fully withdrawable.
    pub fn is_fully_withdrawable_validator(&self, balance: u64, epoch: u64) -> bool {
        self.has_execution_withdrawal_credential()
            && self.withdrawable_epoch <= epoch
            && balance > 0
    }

    /// Check if ``validator`` is partially withdrawable.
    pub fn is_partially_withdrawable_validator(&self, balance: u64) -> bool {
        self.has_execution_withdrawal_credential() && balance > self.principal_balance
    }
}
