//! State and payload fixtures shared by the withdrawal scenario tests.

use alloy_primitives::{Address, B256};
use anyhow::anyhow;
use ream_consensus_beacon::{
    beacon_state::{
        Balances, BeaconState, PendingPartialWithdrawals, Validators, capella::BeaconStateCapella,
        electra::BeaconStateElectra, traits::HasBalances,
    },
    execution_payload::ExecutionPayload,
    pending_partial_withdrawal::PendingPartialWithdrawal,
    withdrawal::Withdrawal,
};
use ream_consensus_misc::{
    constants::beacon::{
        BLS_WITHDRAWAL_PREFIX, COMPOUNDING_WITHDRAWAL_PREFIX, ETH1_ADDRESS_WITHDRAWAL_PREFIX,
        FAR_FUTURE_EPOCH, MIN_ACTIVATION_BALANCE,
    },
    fork_name::ForkName,
    index::{ValidatorIndex, WithdrawalIndex},
    validator::Validator,
};
use ream_network_spec::networks::{BeaconNetworkSpec, MAINNET};
use ssz_types::VariableList;

pub const GWEI_PER_ETH: u64 = 1_000_000_000;

/// Mainnet parameters with a sweep window of ``sweep`` validators.
pub fn spec_with_sweep(sweep: u64) -> BeaconNetworkSpec {
    BeaconNetworkSpec {
        max_validators_per_withdrawals_sweep: sweep,
        ..(**MAINNET).clone()
    }
}

/// Deterministic execution address for ``validator_index``.
pub fn execution_address(validator_index: u64) -> Address {
    let mut address = [0u8; 20];
    address[12..].copy_from_slice(&validator_index.to_be_bytes());
    address[0] = 0xEC;
    Address::from(address)
}

fn credentials(prefix: &[u8], validator_index: u64) -> B256 {
    let mut withdrawal_credentials = B256::ZERO;
    withdrawal_credentials[..1].copy_from_slice(prefix);
    withdrawal_credentials[12..].copy_from_slice(execution_address(validator_index).as_slice());
    withdrawal_credentials
}

/// Builds a registry where every validator starts active, with BLS credentials and exactly
/// ``MIN_ACTIVATION_BALANCE``, so nothing is withdrawable until a helper says otherwise.
#[derive(Debug, Clone)]
pub struct RegistryBuilder {
    validators: Vec<Validator>,
    balances: Vec<u64>,
}

impl RegistryBuilder {
    pub fn new(validator_count: u64) -> Self {
        let validators = (0..validator_count)
            .map(|validator_index| Validator {
                withdrawal_credentials: credentials(BLS_WITHDRAWAL_PREFIX, validator_index),
                effective_balance: MIN_ACTIVATION_BALANCE,
                principal_balance: MIN_ACTIVATION_BALANCE,
                exit_epoch: FAR_FUTURE_EPOCH,
                withdrawable_epoch: FAR_FUTURE_EPOCH,
                ..Default::default()
            })
            .collect::<Vec<_>>();
        let balances = vec![MIN_ACTIVATION_BALANCE; validators.len()];
        Self {
            validators,
            balances,
        }
    }

    fn validator(&mut self, validator_index: u64) -> &mut Validator {
        &mut self.validators[validator_index as usize]
    }

    /// Exited validator with an execution address, withdrawable since genesis.
    pub fn fully_withdrawable(mut self, validator_index: u64, balance: u64) -> Self {
        let validator = self.validator(validator_index);
        validator.withdrawal_credentials =
            credentials(ETH1_ADDRESS_WITHDRAWAL_PREFIX, validator_index);
        validator.exit_epoch = 0;
        validator.withdrawable_epoch = 0;
        self.balances[validator_index as usize] = balance;
        self
    }

    /// Active validator with an execution address holding ``excess`` above its principal.
    pub fn partially_withdrawable(mut self, validator_index: u64, excess: u64) -> Self {
        let validator = self.validator(validator_index);
        validator.withdrawal_credentials =
            credentials(ETH1_ADDRESS_WITHDRAWAL_PREFIX, validator_index);
        let principal_balance = validator.principal_balance;
        self.balances[validator_index as usize] = principal_balance + excess;
        self
    }

    /// Active compounding validator with ``balance``.
    pub fn compounding(mut self, validator_index: u64, balance: u64) -> Self {
        let validator = self.validator(validator_index);
        validator.withdrawal_credentials =
            credentials(COMPOUNDING_WITHDRAWAL_PREFIX, validator_index);
        self.balances[validator_index as usize] = balance;
        self
    }

    pub fn principal_balance(mut self, validator_index: u64, principal_balance: u64) -> Self {
        self.validator(validator_index).principal_balance = principal_balance;
        self
    }

    /// Mark ``validator_index`` as having initiated an exit that is not yet withdrawable.
    pub fn exiting(mut self, validator_index: u64) -> Self {
        let validator = self.validator(validator_index);
        validator.exit_epoch = 1;
        validator.withdrawable_epoch = FAR_FUTURE_EPOCH - 1;
        self
    }

    fn registry(self) -> anyhow::Result<(Validators, Balances)> {
        Ok((
            Validators::new(self.validators)
                .map_err(|err| anyhow!("Failed to build validators: {err:?}"))?,
            Balances::new(self.balances)
                .map_err(|err| anyhow!("Failed to build balances: {err:?}"))?,
        ))
    }

    /// Capella state at ``slot`` with the given withdrawal cursors.
    pub fn capella(
        self,
        slot: u64,
        next_withdrawal_index: u64,
        next_withdrawal_validator_index: u64,
    ) -> anyhow::Result<BeaconState> {
        let (validators, balances) = self.registry()?;
        Ok(BeaconState::Capella(BeaconStateCapella {
            slot,
            validators,
            balances,
            next_withdrawal_index: WithdrawalIndex(next_withdrawal_index),
            next_withdrawal_validator_index: ValidatorIndex(next_withdrawal_validator_index),
            ..Default::default()
        }))
    }

    /// Electra-layout state at ``slot`` for ``fork``, which must be Electra or later.
    pub fn electra(
        self,
        fork: ForkName,
        slot: u64,
        next_withdrawal_validator_index: u64,
        pending_partial_withdrawals: Vec<PendingPartialWithdrawal>,
    ) -> anyhow::Result<BeaconState> {
        let (validators, balances) = self.registry()?;
        let state = BeaconStateElectra {
            slot,
            validators,
            balances,
            next_withdrawal_validator_index: ValidatorIndex(next_withdrawal_validator_index),
            pending_partial_withdrawals: PendingPartialWithdrawals::new(
                pending_partial_withdrawals,
            )
            .map_err(|err| anyhow!("Failed to build pending partial withdrawals: {err:?}"))?,
            ..Default::default()
        };
        match fork {
            ForkName::Electra => Ok(BeaconState::Electra(state)),
            ForkName::Badger => Ok(BeaconState::Badger(state)),
            fork => Err(anyhow!("Fork {fork} does not use the Electra layout")),
        }
    }
}

pub fn pending_partial_withdrawal(
    validator_index: u64,
    amount: u64,
    withdrawable_epoch: u64,
) -> PendingPartialWithdrawal {
    PendingPartialWithdrawal {
        validator_index: ValidatorIndex(validator_index),
        amount,
        withdrawable_epoch,
    }
}

/// Full execution payload carrying ``withdrawals``.
pub fn payload_with(withdrawals: Vec<Withdrawal>) -> anyhow::Result<ExecutionPayload> {
    Ok(ExecutionPayload {
        withdrawals: VariableList::new(withdrawals)
            .map_err(|err| anyhow!("Too many withdrawals for a payload: {err:?}"))?,
        ..Default::default()
    })
}

/// Full execution payload carrying exactly the withdrawals ``state`` expects.
pub fn matching_payload(
    state: &BeaconState,
    spec: &BeaconNetworkSpec,
) -> anyhow::Result<ExecutionPayload> {
    payload_with(state.get_expected_withdrawals(spec)?.to_withdrawals())
}

pub fn total_balance(state: &BeaconState) -> u128 {
    state
        .balances()
        .iter()
        .map(|balance| u128::from(*balance))
        .sum()
}
