use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use ssz_types::serde_utils::quoted_u64_var_list;
use tree_hash_derive::TreeHash;

use super::{Balances, Validators};

/// State layout shared by Base, Altair and Bellatrix, which predate withdrawals.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct BeaconStateBase {
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
}
