use std::thread;

use ream_consensus_beacon::{
    execution_withdrawals::ExecutionWithdrawals,
    state_transition::withdrawals::commitment::withdrawals_root,
};
use withdrawal_scenarios::{GWEI_PER_ETH, RegistryBuilder, matching_payload, spec_with_sweep};

#[test]
fn test_commitment_is_safe_to_compute_in_parallel() {
    let spec = spec_with_sweep(64);
    let limit = spec.max_withdrawals_per_payload as usize;
    let payloads = (0..8u64)
        .map(|block| {
            let state = (0..32)
                .filter(|validator_index| validator_index % 8 == block)
                .fold(RegistryBuilder::new(32), |registry, validator_index| {
                    registry.partially_withdrawable(validator_index, (block + 1) * GWEI_PER_ETH)
                })
                .capella(0, block * 100, 0)
                .unwrap();
            matching_payload(&state, &spec).unwrap()
        })
        .collect::<Vec<_>>();

    let sequential = payloads
        .iter()
        .map(|payload| payload.withdrawals_root(limit).unwrap())
        .collect::<Vec<_>>();
    let parallel = thread::scope(|scope| {
        let handles = payloads
            .iter()
            .map(|payload| scope.spawn(move || withdrawals_root(&payload.withdrawals, limit)))
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap().unwrap())
            .collect::<Vec<_>>()
    });

    assert_eq!(sequential, parallel);
    assert_eq!(
        sequential.iter().collect::<std::collections::HashSet<_>>().len(),
        payloads.len()
    );
}
