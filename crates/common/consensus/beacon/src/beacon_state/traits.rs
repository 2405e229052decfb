//! Capabilities the withdrawal machinery needs from a beacon state.
//!
//! Every accessor checks the protocol version at runtime, so callers get a typed error instead of
//! reading a field that does not exist in the state's layout.

use ream_consensus_misc::{
    fork_name::ForkName,
    index::{ValidatorIndex, WithdrawalIndex},
    validator::Validator,
};

use super::{BeaconState, map_beacon_state};
use crate::{
    pending_partial_withdrawal::PendingPartialWithdrawal,
    state_transition::withdrawals::errors::WithdrawalError,
};

fn position(index: ValidatorIndex) -> Result<usize, WithdrawalError> {
    index
        .to_usize()
        .ok_or(WithdrawalError::ValidatorIndexOutOfBounds {
            validator_index: index,
        })
}

pub trait HasValidators {
    fn fork_name(&self) -> ForkName;

    fn slot(&self) -> u64;

    fn validators(&self) -> &[Validator];

    fn num_validators(&self) -> usize {
        self.validators().len()
    }

    fn validator_at(&self, index: ValidatorIndex) -> Result<&Validator, WithdrawalError> {
        self.validators()
            .get(position(index)?)
            .ok_or(WithdrawalError::ValidatorIndexOutOfBounds {
                validator_index: index,
            })
    }
}

pub trait HasBalances: HasValidators {
    fn balances(&self) -> &[u64];

    /// Mutable view of the balances. The slice cannot change length, so the registry and the
    /// balances always stay the same size.
    fn balances_mut(&mut self) -> &mut [u64];

    fn validators_mut(&mut self) -> &mut [Validator];

    fn balance_at(&self, index: ValidatorIndex) -> Result<u64, WithdrawalError> {
        self.balances()
            .get(position(index)?)
            .copied()
            .ok_or(WithdrawalError::ValidatorIndexOutOfBounds {
                validator_index: index,
            })
    }

    fn update_balance_at(
        &mut self,
        index: ValidatorIndex,
        balance: u64,
    ) -> Result<(), WithdrawalError> {
        let entry = self.balances_mut().get_mut(position(index)?).ok_or(
            WithdrawalError::ValidatorIndexOutOfBounds {
                validator_index: index,
            },
        )?;
        *entry = balance;
        Ok(())
    }

    fn validator_at_mut(
        &mut self,
        index: ValidatorIndex,
    ) -> Result<&mut Validator, WithdrawalError> {
        self.validators_mut()
            .get_mut(position(index)?)
            .ok_or(WithdrawalError::ValidatorIndexOutOfBounds {
                validator_index: index,
            })
    }

    /// Decrease the validator balance at index ``index`` by ``delta``.
    fn decrease_balance(
        &mut self,
        index: ValidatorIndex,
        delta: u64,
    ) -> Result<(), WithdrawalError> {
        let balance = self.balance_at(index)?;
        let new_balance = balance
            .checked_sub(delta)
            .ok_or(WithdrawalError::BalanceUnderflow {
                validator_index: index,
                balance,
                delta,
            })?;
        self.update_balance_at(index, new_balance)
    }

    /// Decrease the balance like [HasBalances::decrease_balance]. From Badger onwards
    /// ``principal_balance`` is then clamped to the remaining balance.
    fn decrease_balance_and_adjust_principal_balance(
        &mut self,
        index: ValidatorIndex,
        delta: u64,
    ) -> Result<(), WithdrawalError> {
        self.decrease_balance(index, delta)?;
        if self.fork_name().adjusts_principal_balance() {
            let balance = self.balance_at(index)?;
            let validator = self.validator_at_mut(index)?;
            validator.principal_balance = validator.principal_balance.min(balance);
        }
        Ok(())
    }
}

pub trait HasWithdrawalCursors {
    fn next_withdrawal_index(&self) -> Result<WithdrawalIndex, WithdrawalError>;

    fn set_next_withdrawal_index(&mut self, index: WithdrawalIndex) -> Result<(), WithdrawalError>;

    fn next_withdrawal_validator_index(&self) -> Result<ValidatorIndex, WithdrawalError>;

    fn set_next_withdrawal_validator_index(
        &mut self,
        index: ValidatorIndex,
    ) -> Result<(), WithdrawalError>;
}

pub trait HasPendingPartialWithdrawals {
    /// The queue, or ``None`` before Electra.
    fn pending_partial_withdrawals(&self) -> Option<&[PendingPartialWithdrawal]>;

    /// Remove the first ``count`` queue entries.
    fn dequeue_partial_withdrawals(&mut self, count: u64) -> Result<(), WithdrawalError>;
}

/// Everything withdrawal processing reads or writes.
pub trait WithdrawalState: HasBalances + HasWithdrawalCursors + HasPendingPartialWithdrawals {}

impl<T: HasBalances + HasWithdrawalCursors + HasPendingPartialWithdrawals + ?Sized> WithdrawalState
    for T
{
}

impl HasValidators for BeaconState {
    fn fork_name(&self) -> ForkName {
        BeaconState::fork_name(self)
    }

    fn slot(&self) -> u64 {
        BeaconState::slot(self)
    }

    fn validators(&self) -> &[Validator] {
        map_beacon_state!(self, state => &state.validators[..])
    }
}

impl HasBalances for BeaconState {
    fn balances(&self) -> &[u64] {
        map_beacon_state!(self, state => &state.balances[..])
    }

    fn balances_mut(&mut self) -> &mut [u64] {
        map_beacon_state!(self, state => &mut state.balances[..])
    }

    fn validators_mut(&mut self) -> &mut [Validator] {
        map_beacon_state!(self, state => &mut state.validators[..])
    }
}

impl HasWithdrawalCursors for BeaconState {
    fn next_withdrawal_index(&self) -> Result<WithdrawalIndex, WithdrawalError> {
        match self {
            BeaconState::Capella(state) | BeaconState::Deneb(state) => {
                Ok(state.next_withdrawal_index)
            }
            BeaconState::Electra(state) | BeaconState::Badger(state) => {
                Ok(state.next_withdrawal_index)
            }
            _ => Err(WithdrawalError::UnsupportedFork {
                fork: self.fork_name(),
            }),
        }
    }

    fn set_next_withdrawal_index(&mut self, index: WithdrawalIndex) -> Result<(), WithdrawalError> {
        let fork = BeaconState::fork_name(self);
        match self {
            BeaconState::Capella(state) | BeaconState::Deneb(state) => {
                state.next_withdrawal_index = index
            }
            BeaconState::Electra(state) | BeaconState::Badger(state) => {
                state.next_withdrawal_index = index
            }
            _ => return Err(WithdrawalError::UnsupportedFork { fork }),
        }
        Ok(())
    }

    fn next_withdrawal_validator_index(&self) -> Result<ValidatorIndex, WithdrawalError> {
        match self {
            BeaconState::Capella(state) | BeaconState::Deneb(state) => {
                Ok(state.next_withdrawal_validator_index)
            }
            BeaconState::Electra(state) | BeaconState::Badger(state) => {
                Ok(state.next_withdrawal_validator_index)
            }
            _ => Err(WithdrawalError::UnsupportedFork {
                fork: self.fork_name(),
            }),
        }
    }

    fn set_next_withdrawal_validator_index(
        &mut self,
        index: ValidatorIndex,
    ) -> Result<(), WithdrawalError> {
        let fork = BeaconState::fork_name(self);
        match self {
            BeaconState::Capella(state) | BeaconState::Deneb(state) => {
                state.next_withdrawal_validator_index = index
            }
            BeaconState::Electra(state) | BeaconState::Badger(state) => {
                state.next_withdrawal_validator_index = index
            }
            _ => return Err(WithdrawalError::UnsupportedFork { fork }),
        }
        Ok(())
    }
}

impl HasPendingPartialWithdrawals for BeaconState {
    fn pending_partial_withdrawals(&self) -> Option<&[PendingPartialWithdrawal]> {
        match self {
            BeaconState::Electra(state) | BeaconState::Badger(state) => {
                Some(&state.pending_partial_withdrawals[..])
            }
            _ => None,
        }
    }

    fn dequeue_partial_withdrawals(&mut self, count: u64) -> Result<(), WithdrawalError> {
        let fork = BeaconState::fork_name(self);
        match self {
            BeaconState::Electra(state) | BeaconState::Badger(state) => {
                state.dequeue_partial_withdrawals(count)
            }
            _ => Err(WithdrawalError::QueueDequeueUnsupported { fork }),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::B256;
    use ream_consensus_misc::constants::beacon::FAR_FUTURE_EPOCH;

    use super::*;
    use crate::beacon_state::{
        Balances, Validators, base::BeaconStateBase, capella::BeaconStateCapella,
        electra::BeaconStateElectra,
    };

    fn registry(count: usize) -> (Validators, Balances) {
        let validator = Validator {
            withdrawal_credentials: B256::repeat_byte(0x01),
            effective_balance: 32_000_000_000,
            principal_balance: 32_000_000_000,
            exit_epoch: FAR_FUTURE_EPOCH,
            withdrawable_epoch: FAR_FUTURE_EPOCH,
            ..Default::default()
        };
        (
            Validators::new(vec![validator; count]).unwrap(),
            Balances::new(vec![33_000_000_000; count]).unwrap(),
        )
    }

    fn state(fork: ForkName) -> BeaconState {
        let (validators, balances) = registry(4);
        match fork {
            ForkName::Base | ForkName::Altair | ForkName::Bellatrix => {
                let state = BeaconStateBase {
                    validators,
                    balances,
                    ..Default::default()
                };
                match fork {
                    ForkName::Base => BeaconState::Base(state),
                    ForkName::Altair => BeaconState::Altair(state),
                    _ => BeaconState::Bellatrix(state),
                }
            }
            ForkName::Capella | ForkName::Deneb => {
                let state = BeaconStateCapella {
                    validators,
                    balances,
                    ..Default::default()
                };
                match fork {
                    ForkName::Capella => BeaconState::Capella(state),
                    _ => BeaconState::Deneb(state),
                }
            }
            ForkName::Electra | ForkName::Badger => {
                let state = BeaconStateElectra {
                    validators,
                    balances,
                    ..Default::default()
                };
                match fork {
                    ForkName::Electra => BeaconState::Electra(state),
                    _ => BeaconState::Badger(state),
                }
            }
        }
    }

    #[test]
    fn test_capabilities_follow_fork() {
        for fork in ForkName::ALL {
            let mut state = state(fork);

            assert_eq!(HasValidators::fork_name(&state), fork);
            assert_eq!(state.num_validators(), 4);
            assert_eq!(
                state.next_withdrawal_index().is_ok(),
                fork.supports_withdrawals()
            );
            assert_eq!(
                state
                    .set_next_withdrawal_validator_index(ValidatorIndex(3))
                    .is_ok(),
                fork.supports_withdrawals()
            );
            assert_eq!(
                state.pending_partial_withdrawals().is_some(),
                fork.supports_pending_partial_withdrawals()
            );
            assert_eq!(
                state.dequeue_partial_withdrawals(0).is_ok(),
                fork.supports_pending_partial_withdrawals()
            );
        }
    }

    #[test]
    fn test_cursor_accessors_before_capella_report_fork() {
        let mut state = state(ForkName::Bellatrix);

        assert!(matches!(
            state.next_withdrawal_validator_index(),
            Err(WithdrawalError::UnsupportedFork {
                fork: ForkName::Bellatrix
            })
        ));
        assert!(matches!(
            state.set_next_withdrawal_index(WithdrawalIndex(1)),
            Err(WithdrawalError::UnsupportedFork {
                fork: ForkName::Bellatrix
            })
        ));
        assert!(matches!(
            state.dequeue_partial_withdrawals(0),
            Err(WithdrawalError::QueueDequeueUnsupported {
                fork: ForkName::Bellatrix
            })
        ));
    }

    #[test]
    fn test_wide_index_does_not_alias_a_registry_slot() {
        let mut state = state(ForkName::Capella);
        // Truncated to 32 bits this would be validator 1.
        let index = ValidatorIndex((1 << 32) + 1);

        assert!(matches!(
            state.validator_at(index),
            Err(WithdrawalError::ValidatorIndexOutOfBounds { .. })
        ));
        assert!(matches!(
            state.balance_at(index),
            Err(WithdrawalError::ValidatorIndexOutOfBounds { .. })
        ));
        assert!(matches!(
            state.decrease_balance(index, 1),
            Err(WithdrawalError::ValidatorIndexOutOfBounds { .. })
        ));
        assert_eq!(state.balance_at(ValidatorIndex(1)).unwrap(), 33_000_000_000);
    }

    #[test]
    fn test_decrease_balance_underflow_is_an_error() {
        let mut state = state(ForkName::Capella);

        assert!(matches!(
            state.decrease_balance(ValidatorIndex(1), 33_000_000_001),
            Err(WithdrawalError::BalanceUnderflow {
                balance: 33_000_000_000,
                delta: 33_000_000_001,
                ..
            })
        ));
        assert_eq!(state.balance_at(ValidatorIndex(1)).unwrap(), 33_000_000_000);
    }

    #[test]
    fn test_out_of_range_index_is_an_error() {
        let mut state = state(ForkName::Electra);

        assert!(matches!(
            state.validator_at(ValidatorIndex(4)),
            Err(WithdrawalError::ValidatorIndexOutOfBounds { .. })
        ));
        assert!(matches!(
            state.update_balance_at(ValidatorIndex(4), 0),
            Err(WithdrawalError::ValidatorIndexOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_principal_balance_clamped_from_badger() {
        for (fork, expected_principal) in [
            (ForkName::Electra, 32_000_000_000),
            (ForkName::Badger, 31_000_000_000),
        ] {
            let mut state = state(fork);
            state
                .decrease_balance_and_adjust_principal_balance(ValidatorIndex(2), 2_000_000_000)
                .unwrap();

            assert_eq!(state.balance_at(ValidatorIndex(2)).unwrap(), 31_000_000_000);
            assert_eq!(
                state.validator_at(ValidatorIndex(2)).unwrap().principal_balance,
                expected_principal
            );
        }
    }

    #[test]
    fn test_principal_balance_kept_when_balance_stays_above() {
        let mut state = state(ForkName::Badger);
        state
            .decrease_balance_and_adjust_principal_balance(ValidatorIndex(0), 1_000_000_000)
            .unwrap();

        assert_eq!(state.balance_at(ValidatorIndex(0)).unwrap(), 32_000_000_000);
        assert_eq!(
            state.validator_at(ValidatorIndex(0)).unwrap().principal_balance,
            32_000_000_000
        );
    }
}
