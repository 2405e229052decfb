use alloy_primitives::B256;
use ream_consensus_misc::index::{ValidatorIndex, WithdrawalIndex};
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use ssz_types::serde_utils::quoted_u64_var_list;
use tree_hash_derive::TreeHash;

use super::{Balances, Validators};

/// State layout shared by Capella and Deneb.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct BeaconStateCapella {
    // Versioning
    #[serde(with = "serde_utils::quoted_u64")]
    pub genesis_time: u64,
    pub genesis_validators_root: B256,
    #[serde(with = "serde_utils::quoted_u64")]
    pub slot: u64,

    // Registry
    pub validators: Validators,
    #[serde(with = "quoted_u64_var_list")]
    pub balances: Balances,

    // Withdrawals
    pub next_withdrawal_index: WithdrawalIndex,
    pub next_withdrawal_validator_index: ValidatorIndex,
}
